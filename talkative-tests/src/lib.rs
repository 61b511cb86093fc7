use cucumber::World;
use std::collections::HashMap;
use talkative_core::{
    ClientEvent, MatchError, Matchmaker, MemorySink, Outcome, ServerEvent, SessionId,
};

/// A named test client: its session id and the sink recording what it receives
#[derive(Debug, Clone)]
pub struct Client {
    pub id: SessionId,
    pub sink: MemorySink,
}

#[derive(Debug, World, Default)]
pub struct RelayWorld {
    /// Matchmaker (the system under test)
    pub matchmaker: Matchmaker<MemorySink>,

    /// Clients by scenario name ("A", "B", ...)
    pub clients: HashMap<String, Client>,

    /// Outcome of the last inbound event, per sender
    pub last_outcomes: HashMap<String, Outcome>,

    /// Last rejected connect
    pub last_error: Option<MatchError>,
}

impl RelayWorld {
    /// Connect a new client under `name`
    pub fn connect(&mut self, name: &str) -> SessionId {
        let id = SessionId::new();
        let sink = MemorySink::new();
        match self.matchmaker.connect(id, sink.clone()) {
            Ok(()) => {
                self.clients.insert(name.to_string(), Client { id, sink });
            }
            Err(e) => self.last_error = Some(e),
        }
        id
    }

    /// Deliver an inbound event from `name`
    pub fn send(&mut self, name: &str, event: ClientEvent) -> Outcome {
        let id = self.id(name);
        let outcome = self.matchmaker.handle(id, event);
        self.last_outcomes.insert(name.to_string(), outcome);
        outcome
    }

    pub fn disconnect(&mut self, name: &str) -> bool {
        let id = self.id(name);
        self.matchmaker.disconnect(id)
    }

    pub fn client(&self, name: &str) -> &Client {
        self.clients
            .get(name)
            .unwrap_or_else(|| panic!("Client '{}' not found", name))
    }

    pub fn id(&self, name: &str) -> SessionId {
        self.client(name).id
    }

    pub fn sink(&self, name: &str) -> &MemorySink {
        &self.client(name).sink
    }

    /// Name of the client owning `id`
    pub fn name_of(&self, id: SessionId) -> Option<&str> {
        self.clients
            .iter()
            .find(|(_, client)| client.id == id)
            .map(|(name, _)| name.as_str())
    }

    /// Number of events with wire name `event` received by `name`
    pub fn received(&self, name: &str, event: &str) -> usize {
        self.sink(name).count(|e| e.name() == event)
    }

    /// Chat texts received by `name`, oldest first
    pub fn chat_texts(&self, name: &str) -> Vec<String> {
        self.sink(name)
            .events()
            .into_iter()
            .filter_map(|e| match e {
                ServerEvent::ChatMessage(payload) => payload
                    .get("text")
                    .and_then(|t| t.as_str())
                    .map(str::to_string),
                _ => None,
            })
            .collect()
    }

    /// Names of clients that are still connected
    pub fn connected_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .clients
            .iter()
            .filter(|(_, client)| self.matchmaker.is_connected(client.id))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

/// Split "A, B and C" into ["A", "B", "C"]
pub fn parse_names(list: &str) -> Vec<String> {
    list.split(", ")
        .flat_map(|part| part.split(" and "))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
