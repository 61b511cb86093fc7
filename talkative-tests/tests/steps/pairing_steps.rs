use cucumber::{given, then, when};
use talkative_core::{ClientEvent, IgnoreReason, Outcome, SessionState};
use talkative_tests::{parse_names, RelayWorld};

// ===== Given Steps =====

#[given(regex = r"^clients? (.+) (?:is|are) connected$")]
async fn clients_connected(world: &mut RelayWorld, names: String) {
    for name in parse_names(&names) {
        world.connect(&name);
    }
}

#[given(expr = "{word} and {word} are paired")]
async fn clients_paired(world: &mut RelayWorld, first: String, second: String) {
    world.send(&first, ClientEvent::FindPeer);
    let outcome = world.send(&second, ClientEvent::FindPeer);

    assert_eq!(outcome, Outcome::Matched(world.id(&first)));
}

// ===== When Steps =====

#[when(regex = r"^clients? (.+) connects?$")]
async fn clients_connect(world: &mut RelayWorld, names: String) {
    for name in parse_names(&names) {
        world.connect(&name);
    }
}

#[when(expr = "{word} looks for a peer")]
async fn looks_for_peer(world: &mut RelayWorld, name: String) {
    world.send(&name, ClientEvent::FindPeer);
}

#[when(expr = "{word} stops searching")]
async fn stops_searching(world: &mut RelayWorld, name: String) {
    world.send(&name, ClientEvent::StopSearch);
}

#[when(expr = "{word} skips the peer")]
async fn skips_peer(world: &mut RelayWorld, name: String) {
    world.send(&name, ClientEvent::SkipPeer);
}

#[when(expr = "{word} disconnects")]
async fn disconnects(world: &mut RelayWorld, name: String) {
    world.disconnect(&name);
}

// ===== Then Steps =====

#[then(expr = "{word} and {word} are paired with each other")]
async fn paired_with_each_other(world: &mut RelayWorld, first: String, second: String) {
    let first_id = world.id(&first);
    let second_id = world.id(&second);

    assert_eq!(world.matchmaker.peer_of(first_id), Some(second_id));
    assert_eq!(world.matchmaker.peer_of(second_id), Some(first_id));
}

#[then(regex = r"^(\w+) is (idle|waiting|paired)$")]
async fn is_in_state(world: &mut RelayWorld, name: String, state: String) {
    let expected = match state.as_str() {
        "idle" => SessionState::Idle,
        "waiting" => SessionState::Queued,
        _ => SessionState::Paired,
    };

    assert_eq!(world.matchmaker.state_of(world.id(&name)), Some(expected));
}

#[then(expr = "{word} is no longer connected")]
async fn no_longer_connected(world: &mut RelayWorld, name: String) {
    assert_eq!(world.matchmaker.state_of(world.id(&name)), None);
}

#[then(expr = "{word} is queued exactly once")]
async fn queued_once(world: &mut RelayWorld, name: String) {
    let id = world.id(&name);
    let entries = world
        .matchmaker
        .waiting()
        .into_iter()
        .filter(|queued| *queued == id)
        .count();

    assert_eq!(entries, 1);
}

#[then(regex = r#"^(\w+) received (\d+) "([a-z-]+)" events?$"#)]
async fn received_events(world: &mut RelayWorld, name: String, count: usize, event: String) {
    assert_eq!(
        world.received(&name, &event),
        count,
        "{} received {:?}",
        name,
        world.sink(&name).events()
    );
}

#[then(regex = r"^the request from (\w+) was ignored because it is already (queued|paired)$")]
async fn request_ignored(world: &mut RelayWorld, name: String, reason: String) {
    let expected = match reason.as_str() {
        "queued" => IgnoreReason::AlreadyQueued,
        _ => IgnoreReason::AlreadyPaired,
    };

    assert_eq!(
        world.last_outcomes.get(&name),
        Some(&Outcome::Ignored(expected))
    );
}

#[then("the waiting queue is empty")]
async fn waiting_queue_empty(world: &mut RelayWorld) {
    assert!(world.matchmaker.waiting().is_empty());
}

#[then("the pairing state is consistent")]
async fn pairing_consistent(world: &mut RelayWorld) {
    if let Err(violation) = world.matchmaker.check_invariants() {
        panic!("Invariant violated: {}", violation);
    }
}
