// Successful batches: shared and per-call result types, mixed id kinds and
// what ends up on the wire.

use jrpc_client::logging::init_test_logging;
use jrpc_client::{Client, Id, IdKind, Params, PendingCall, RecordingTransport, ReturnType};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Player {
    first_name: String,
    last_name: String,
    team: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Team {
    name: String,
    city: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Entity {
    Player(Player),
    Team(Team),
    Count(u32),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerQuery<'a> {
    first_name: &'a str,
    last_name: &'a str,
}

fn player(first_name: &str, last_name: &str, team: &str) -> Player {
    Player {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        team: team.to_string(),
    }
}

fn client(response: Value) -> Client<RecordingTransport> {
    init_test_logging();
    Client::new(RecordingTransport::always(response.to_string()))
}

#[test]
fn test_batch_with_common_return_type() {
    let client = client(json!([
        {"jsonrpc": "2.0", "id": 2, "result": {"firstName": "Vladimir", "lastName": "Sobotka", "team": "St. Louis Blues"}},
        {"jsonrpc": "2.0", "id": 1, "result": {"firstName": "Steven", "lastName": "Stamkos", "team": "Tampa Bay Lightning"}}
    ]));

    let players = client
        .batch::<Player>()
        .add(1, "findPlayer", ("Steven", "Stamkos"))
        .add(2, "findPlayer", ("Vladimir", "Sobotka"))
        .keys_type(IdKind::Number)
        .return_type(ReturnType::of())
        .execute()
        .unwrap();

    assert_eq!(players.len(), 2);
    // Arrival order, not request order.
    let ids: Vec<_> = players.keys().cloned().collect();
    assert_eq!(ids, vec![Id::Number(2), Id::Number(1)]);
    assert_eq!(
        players[&Id::Number(1)],
        player("Steven", "Stamkos", "Tampa Bay Lightning")
    );
    assert_eq!(
        players[&Id::Number(2)],
        player("Vladimir", "Sobotka", "St. Louis Blues")
    );
}

#[test]
fn test_request_body_on_the_wire() {
    let client = client(json!([
        {"jsonrpc": "2.0", "id": 1, "result": null},
        {"jsonrpc": "2.0", "id": "2", "result": null}
    ]));

    client
        .batch::<Option<Player>>()
        .add(1, "findPlayer", ("Steven", "Stamkos"))
        .add(
            "2",
            "findPlayer",
            PlayerQuery {
                first_name: "Vladimir",
                last_name: "Sobotka",
            },
        )
        .return_type(ReturnType::of())
        .execute()
        .unwrap();

    let sent: Value = serde_json::from_str(&client.transport().last_request().unwrap()).unwrap();
    assert_eq!(
        sent,
        json!([
            {"jsonrpc": "2.0", "id": 1, "method": "findPlayer", "params": ["Steven", "Stamkos"]},
            {"jsonrpc": "2.0", "id": "2", "method": "findPlayer", "params": {"firstName": "Vladimir", "lastName": "Sobotka"}}
        ])
    );
}

#[test]
fn test_ids_of_different_kinds_do_not_collide() {
    let client = client(json!([
        {"jsonrpc": "2.0", "id": "1", "result": "string id"},
        {"jsonrpc": "2.0", "id": 1, "result": "number id"}
    ]));

    let results = client
        .batch::<String>()
        .add(1, "echo", ("number id",))
        .add("1", "echo", ("string id",))
        .return_type(ReturnType::of())
        .execute()
        .unwrap();

    assert_eq!(results[&Id::Number(1)], "number id");
    assert_eq!(results[&Id::from("1")], "string id");
}

#[test]
fn test_heterogeneous_results_with_per_call_types() {
    let client = client(json!([
        {"jsonrpc": "2.0", "id": "player", "result": {"firstName": "Steven", "lastName": "Stamkos", "team": "Tampa Bay Lightning"}},
        {"jsonrpc": "2.0", "id": "team", "result": {"name": "Lightning", "city": "Tampa Bay"}},
        {"jsonrpc": "2.0", "id": "count", "result": 23}
    ]));

    let results = client
        .batch::<Entity>()
        .add_with_type(
            "player",
            "findPlayer",
            ("Steven", "Stamkos"),
            ReturnType::map(Entity::Player),
        )
        .add_with_type(
            "team",
            "findTeam",
            ("Lightning",),
            ReturnType::map(Entity::Team),
        )
        .add_with_type(
            "count",
            "countPlayers",
            ("Lightning",),
            ReturnType::map(Entity::Count),
        )
        .keys_type(IdKind::String)
        .execute()
        .unwrap();

    assert_eq!(
        results[&Id::from("player")],
        Entity::Player(player("Steven", "Stamkos", "Tampa Bay Lightning"))
    );
    assert_eq!(
        results[&Id::from("team")],
        Entity::Team(Team {
            name: "Lightning".to_string(),
            city: "Tampa Bay".to_string(),
        })
    );
    assert_eq!(results[&Id::from("count")], Entity::Count(23));
}

#[test]
fn test_custom_conversion() {
    let client = client(json!([
        {"jsonrpc": "2.0", "id": 1, "result": {"firstName": "Steven", "lastName": "Stamkos", "team": "Tampa Bay Lightning"}}
    ]));

    let names = client
        .batch::<String>()
        .add(1, "findPlayer", ("Steven", "Stamkos"))
        .return_type(ReturnType::with("full name", |value| {
            let player: Player = serde_json::from_value(value)?;
            Ok(format!("{} {}", player.first_name, player.last_name))
        }))
        .execute()
        .unwrap();

    assert_eq!(names[&Id::Number(1)], "Steven Stamkos");
}

#[test]
fn test_null_result_is_a_success() {
    let client = client(json!([
        {"jsonrpc": "2.0", "id": 1, "result": null, "error": null}
    ]));

    let results = client
        .batch::<Option<Player>>()
        .add(1, "findPlayer", ("Wayne", "Gretzky"))
        .return_type(ReturnType::of())
        .execute()
        .unwrap();

    assert_eq!(results[&Id::Number(1)], None);
}

#[test]
fn test_prebuilt_calls() {
    let client = client(json!([
        {"jsonrpc": "2.0", "id": 5, "result": true}
    ]));

    let results = client
        .batch::<bool>()
        .add_call(
            PendingCall::new(5, "isActive", Params::Positional(vec![json!("Stamkos")]))
                .with_return_type(ReturnType::of()),
        )
        .execute()
        .unwrap();

    assert!(results[&Id::Number(5)]);
    let sent = client.transport().last_request().unwrap();
    assert!(sent.contains(r#""method":"isActive""#));
}
