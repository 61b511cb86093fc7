use cucumber::{given, then, when};
use talkative_core::MatchError;
use talkative_tests::RelayWorld;

#[given(expr = "the connection of {word} is broken")]
async fn connection_broken(world: &mut RelayWorld, name: String) {
    world.sink(&name).close();
}

#[when(expr = "the connection of {word} breaks")]
async fn connection_breaks(world: &mut RelayWorld, name: String) {
    world.sink(&name).close();
}

#[when(expr = "{word} connects again with the same session")]
async fn reconnects_same_session(world: &mut RelayWorld, name: String) {
    let client = world.client(&name).clone();
    if let Err(e) = world.matchmaker.connect(client.id, client.sink) {
        world.last_error = Some(e);
    }
}

#[then(expr = "all connected clients see a user count of {int}")]
async fn all_see_count(world: &mut RelayWorld, count: usize) {
    for name in world.connected_names() {
        assert_eq!(
            world.sink(&name).last_user_count(),
            Some(count),
            "user count seen by {}",
            name
        );
    }
}

#[then(expr = "{word} sees a user count of {int}")]
async fn client_sees_count(world: &mut RelayWorld, name: String, count: usize) {
    assert_eq!(world.sink(&name).last_user_count(), Some(count));
}

#[then(regex = r"^(\d+) sessions? (?:is|are) connected$")]
async fn sessions_connected(world: &mut RelayWorld, count: usize) {
    let snapshot = world.matchmaker.snapshot();

    assert_eq!(snapshot.connected, count);
    assert_eq!(snapshot.last_user_count, Some(count));
}

#[then("the duplicate session is rejected")]
async fn duplicate_rejected(world: &mut RelayWorld) {
    assert!(matches!(
        world.last_error,
        Some(MatchError::DuplicateSession(_))
    ));
}
