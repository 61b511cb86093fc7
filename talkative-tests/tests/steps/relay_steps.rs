use cucumber::{then, when};
use serde_json::json;
use talkative_core::{ChatMessage, ClientEvent, Outcome, ServerEvent};
use talkative_tests::RelayWorld;

const FIXED_TIMESTAMP: &str = "2024-01-01T12:00:00.000Z";

fn sample_offer() -> serde_json::Value {
    json!({
        "type": "offer",
        "sdp": "v=0\r\no=- 4611731400430051336 2 IN IP4 127.0.0.1\r\ns=-\r\n"
    })
}

// ===== When Steps =====

#[when(expr = "{word} sends the chat message {string}")]
async fn sends_chat(world: &mut RelayWorld, name: String, text: String) {
    let event = ChatMessage::new(text, FIXED_TIMESTAMP).into_event();
    world.send(&name, event);
}

#[when(expr = "{word} sends an offer")]
async fn sends_offer(world: &mut RelayWorld, name: String) {
    world.send(&name, ClientEvent::Offer(sample_offer()));
}

#[when(expr = "{word} sends an ICE candidate")]
async fn sends_ice_candidate(world: &mut RelayWorld, name: String) {
    world.send(
        &name,
        ClientEvent::IceCandidate(json!({
            "candidate": "candidate:842163049 1 udp 1677729535 203.0.113.7 46154 typ srflx",
            "sdpMid": "0",
            "sdpMLineIndex": 0
        })),
    );
}

// ===== Then Steps =====

#[then(expr = "{word} receives the chat message {string}")]
async fn receives_chat(world: &mut RelayWorld, name: String, text: String) {
    assert_eq!(world.chat_texts(&name).last(), Some(&text));

    let last_chat = world
        .sink(&name)
        .events()
        .into_iter()
        .rev()
        .find(|e| matches!(e, ServerEvent::ChatMessage(_)));
    assert_eq!(
        last_chat,
        Some(ServerEvent::ChatMessage(json!({
            "text": text,
            "timestamp": FIXED_TIMESTAMP
        })))
    );
}

#[then(expr = "{word} receives no chat message")]
async fn receives_no_chat(world: &mut RelayWorld, name: String) {
    assert!(world.chat_texts(&name).is_empty());
}

#[then(expr = "{word} receives the offer unchanged")]
async fn receives_offer(world: &mut RelayWorld, name: String) {
    assert!(world
        .sink(&name)
        .events()
        .contains(&ServerEvent::Offer(sample_offer())));
}

#[then(expr = "{word} receives no signaling messages")]
async fn receives_no_signaling(world: &mut RelayWorld, name: String) {
    let signaling = world.sink(&name).count(|e| {
        matches!(
            e,
            ServerEvent::Offer(_) | ServerEvent::Answer(_) | ServerEvent::IceCandidate(_)
        )
    });

    assert_eq!(signaling, 0);
}

#[then(expr = "the message from {word} was relayed to {word}")]
async fn message_relayed(world: &mut RelayWorld, sender: String, target: String) {
    assert_eq!(
        world.last_outcomes.get(&sender),
        Some(&Outcome::Relayed(world.id(&target)))
    );
}

#[then(expr = "the message from {word} was dropped")]
async fn message_dropped(world: &mut RelayWorld, sender: String) {
    let outcome = world.last_outcomes.get(&sender).copied();

    assert!(
        matches!(outcome, Some(Outcome::Dropped) | Some(Outcome::Ignored(_))),
        "{:?}",
        outcome
    );
}
