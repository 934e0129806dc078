/// End-to-end MCP sessions over the line protocol
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use strike_habits::mcp::McpServer;
use strike_habits::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod mcp_session_tests {
    use super::*;

    fn server_on(db: &NamedTempFile, day: u32) -> McpServer<SqliteStorage> {
        let storage = SqliteStorage::new(db.path().to_path_buf()).expect("Failed to open storage");
        let tracker = HabitTrackerServer::with_storage(storage, StreakEngine::default())
            .with_clock(Utc.with_ymd_and_hms(2024, 6, day, 20, 0, 0).unwrap());
        McpServer::new(tracker)
    }

    fn call(id: u32, name: &str, arguments: Value) -> String {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        })
        .to_string()
    }

    async fn run_session(server: &mut McpServer<SqliteStorage>, lines: &[String]) -> Vec<Value> {
        let input = lines.join("\n") + "\n";
        let mut output = Vec::new();
        server
            .serve(input.as_bytes(), &mut output)
            .await
            .expect("Session failed");

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    /// JSON payload that follows the message in a tool result
    fn payload(response: &Value) -> Value {
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        let (_, json) = text.split_once("\n\n").unwrap();
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_streak_builds_across_days() {
        let db = NamedTempFile::new().expect("Failed to create temp file");

        let mut day_one = server_on(&db, 3);
        let responses = run_session(
            &mut day_one,
            &[
                json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}).to_string(),
                json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
                call(2, "habit_create", json!({"title": "Walk", "frequency_count": 1})),
                call(3, "habit_create", json!({"title": "No snacks", "type": "inverse"})),
            ],
        )
        .await;
        assert_eq!(responses.len(), 3);
        let walk_id = payload(&responses[1])["id"].as_str().unwrap().to_string();
        let snacks_id = payload(&responses[2])["id"].as_str().unwrap().to_string();

        for (day, id) in [(3, 10), (4, 11), (5, 12)] {
            let mut server = server_on(&db, day);
            run_session(&mut server, &[call(id, "habit_toggle", json!({"habit_id": walk_id}))]).await;
        }

        // Slip on the inverse habit on the 5th
        let mut day_five = server_on(&db, 5);
        let responses = run_session(
            &mut day_five,
            &[
                call(20, "habit_toggle", json!({"habit_id": snacks_id})),
                call(21, "habit_list", json!({})),
            ],
        )
        .await;

        let toggled = payload(&responses[0]);
        assert_eq!(toggled["completed_count"], -1);
        assert_eq!(toggled["view"]["isCompletedToday"], false);

        let habits = payload(&responses[1]);
        let habits = habits.as_array().unwrap();
        assert_eq!(habits.len(), 2);

        let walk = habits.iter().find(|h| h["title"] == "Walk").unwrap();
        assert_eq!(walk["currentStreak"], 3);
        assert_eq!(walk["completedCountToday"], 1);
        assert_eq!(
            walk["historyDates"],
            json!(["2024-06-03", "2024-06-04", "2024-06-05"])
        );

        let snacks = habits.iter().find(|h| h["title"] == "No snacks").unwrap();
        assert_eq!(snacks["isCompletedToday"], false);
        assert_eq!(snacks["completedCountToday"], 0);
        assert_eq!(snacks["currentStreak"], 2);
        assert_eq!(snacks["historyDates"], json!(["2024-06-03", "2024-06-04"]));
    }

    #[tokio::test]
    async fn test_update_and_delete_over_protocol() {
        let db = NamedTempFile::new().expect("Failed to create temp file");
        let mut server = server_on(&db, 10);

        let responses = run_session(
            &mut server,
            &[call(1, "habit_create", json!({"title": "Pushups", "is_quantifiable": true, "target_value": 20}))],
        )
        .await;
        let habit = payload(&responses[0]);
        assert_eq!(habit["type"], "quantifiable");
        let habit_id = habit["id"].as_str().unwrap().to_string();

        let responses = run_session(
            &mut server,
            &[
                call(2, "habit_update", json!({"habit_id": habit_id, "target_value": 0})),
                call(3, "habit_update", json!({"habit_id": habit_id, "title": "Push-ups", "unit": "reps"})),
                call(4, "habit_delete", json!({"habit_id": habit_id})),
                call(5, "habit_delete", json!({"habit_id": habit_id})),
                call(6, "habit_list", json!({})),
            ],
        )
        .await;

        assert_eq!(responses[0]["result"]["isError"], true);
        assert_eq!(payload(&responses[1])["title"], "Push-ups");
        assert_eq!(responses[2]["result"]["isError"], false);
        assert_eq!(responses[3]["result"]["isError"], true);
        assert!(responses[4]["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("No habits found"));
    }

    #[tokio::test]
    async fn test_bad_arguments_are_invalid_params() {
        let db = NamedTempFile::new().expect("Failed to create temp file");
        let mut server = server_on(&db, 10);

        let responses = run_session(
            &mut server,
            &[
                call(1, "habit_toggle", json!({"amount": 2})),
                call(2, "habit_create", json!({"title": "Yoga", "type": "sometimes"})),
            ],
        )
        .await;

        assert_eq!(responses[0]["error"]["code"], -32602);
        assert_eq!(responses[1]["error"]["code"], -32602);
    }
}
