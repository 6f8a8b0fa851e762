//! End-to-end replay of session scripts through the production runtime.
//!
//! Runs on a paused tokio clock with the simulation environment, so effect
//! timestamps are exact.

use std::{
    io::Write,
    sync::{Arc, Mutex},
};

use huddle_app::Runtime;
use huddle_cli::{CliError, ScriptDriver, open_script};
use huddle_core::NotifierConfig;
use huddle_harness::SimEnv;
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

async fn replay(script: &str, config: NotifierConfig) -> Result<Vec<Value>, CliError> {
    let output = SharedBuf::default();
    let driver = ScriptDriver::new(script.as_bytes(), output.clone());
    Runtime::new(driver, SimEnv::new(), config).run().await?;

    let bytes = output.0.lock().unwrap().clone();
    Ok(String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect())
}

fn visible_uids(line: &Value) -> Vec<&str> {
    line["notifications"]
        .as_array()
        .map(|list| list.iter().filter_map(|n| n["uid"].as_str()).collect())
        .unwrap_or_default()
}

#[tokio::test(start_paused = true)]
async fn pause_and_auto_hide_timeline() {
    let script = r#"
# join, greet, then pause the session
{"delay_ms":0,"event":{"type":"conference_joined","conference":1}}
{"delay_ms":100,"event":{"type":"show","props":{"uid":"hello","title":"Hello"},"timeout":"short"}}
{"delay_ms":400,"event":{"type":"show","props":{"uid":"pause","description":"{\"deviceMessageType\":\"PAUSE_SESSION\",\"recipientRole\":\"patient\"}"}}}
"#;

    let lines = replay(script, NotifierConfig::default()).await.unwrap();

    let summary: Vec<(u64, &str, Vec<&str>)> = lines
        .iter()
        .map(|line| {
            (line["at_ms"].as_u64().unwrap(), line["effect"].as_str().unwrap(), visible_uids(line))
        })
        .collect();

    assert_eq!(summary, vec![
        (0, "render", vec![]),
        (0, "render", vec![]),
        (100, "render", vec!["hello"]),
        (500, "render", vec!["hello", "pause"]),
        (500, "muted", vec![]),
        (500, "render", vec!["hello"]),
        (2600, "render", vec![]),
    ]);
    assert_eq!(lines[1]["conference"], json!(1));
    assert_eq!(lines[3]["notifications"][1]["description"], json!("Session is paused"));
    assert_eq!(lines[4], json!({"at_ms": 500, "effect": "muted", "media": "audio", "muted": true}));
}

#[tokio::test(start_paused = true)]
async fn join_burst_is_summarized_after_the_window() {
    let script = r#"
{"event":{"type":"conference_joined","conference":4}}
{"delay_ms":10,"event":{"type":"participant_joined","participant":{"id":"1","name":"Ada"}}}
{"delay_ms":10,"event":{"type":"participant_joined","participant":{"id":"2","name":"Grace"}}}
"#;
    let config = NotifierConfig { flush_window_ms: 200, ..NotifierConfig::default() };

    let lines = replay(script, config).await.unwrap();
    let shown = lines
        .iter()
        .find(|line| !visible_uids(line).is_empty())
        .expect("summary notification rendered");

    assert_eq!(shown["at_ms"], json!(220));
    assert_eq!(shown["notifications"].as_array().map(Vec::len), Some(1));
    assert_eq!(shown["notifications"][0]["timeout"], json!("short"));
}

#[tokio::test(start_paused = true)]
async fn disabled_replay_renders_nothing_visible() {
    let script = r#"{"event":{"type":"show","props":{"title":"Hi"},"timeout":"sticky"}}"#;
    let config = NotifierConfig { enabled: false, ..NotifierConfig::default() };

    let lines = replay(script, config).await.unwrap();

    assert!(lines.iter().all(|line| visible_uids(line).is_empty()));
}

#[tokio::test(start_paused = true)]
async fn quit_stops_before_pending_timers() {
    let script = r#"
{"event":{"type":"show","props":{"uid":"a","title":"Hi"},"timeout":"long"}}
{"delay_ms":50,"event":{"type":"quit"}}
"#;

    let lines = replay(script, NotifierConfig::default()).await.unwrap();
    let last = lines.last().unwrap();

    assert_eq!(last["at_ms"], json!(0));
    assert_eq!(visible_uids(last), ["a"]);
}

#[tokio::test(start_paused = true)]
async fn invalid_script_line_aborts_replay() {
    let script = "{\"event\":{\"type\":\"tick\"}}\nnot json\n";

    let err = replay(script, NotifierConfig::default()).await.unwrap_err();

    assert!(matches!(err, CliError::InvalidStep { line: 2, .. }), "{err}");
}

#[tokio::test(start_paused = true)]
async fn script_file_replays_like_inline_input() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"event":{{"type":"show","props":{{"uid":"f","title":"From file"}},"timeout":"sticky"}}}}"#)
        .unwrap();

    let output = SharedBuf::default();
    let input = open_script(file.path()).await.unwrap();
    let driver = ScriptDriver::new(input, output.clone());
    let app = Runtime::new(driver, SimEnv::new(), NotifierConfig::default()).run().await.unwrap();

    assert!(app.queue().contains("f"));
    assert!(!output.0.lock().unwrap().is_empty());
}
