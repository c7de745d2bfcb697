//! # Journal Replay
//!
//! Config and journal files loaded from disk and replayed the way the
//! `psb-runtime` binary does it.

#[cfg(test)]
mod tests {
    use super::super::*;
    use psb_runtime::{Journal, RuntimeConfig};
    use std::fs;

    fn replay(config: &RuntimeConfig, journal: &Journal) -> (Loop, Arc<InMemoryHost>) {
        let (mut event_loop, host) = SessionEventLoop::in_memory(config.session.clone());
        journal.install(&host);
        for event in journal.events.iter().cloned() {
            event_loop.submit(event);
        }
        event_loop.run_until_idle();
        (event_loop, host)
    }

    fn journal_json(holder: &str, permission: &str) -> String {
        serde_json::json!({
            "holders": [{
                "id": holder,
                "permissions": [permission],
                "inventory": {
                    "0": {
                        "kind": "minecraft:blue_shulker_box",
                        "amount": 1,
                        "meta": {
                            "kind": { "BlockState": { "Container": { "contents": [] } } }
                        }
                    }
                }
            }],
            "events": [
                { "type": "interact", "holder": holder, "action": "right_click_air", "hand": "Hand" },
                { "type": "held_slot_change", "holder": holder, "previous": 0, "new": 3 },
                { "type": "view_closed", "holder": holder }
            ]
        })
        .to_string()
    }

    #[test]
    fn test_replay_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let holder = uuid::Uuid::new_v4().to_string();

        let config_path = dir.path().join("psb.toml");
        fs::write(
            &config_path,
            "[session]\nopen_permission = \"backpack.open\"\ndefault_title = \"Backpack\"\n",
        )
        .unwrap();
        let journal_path = dir.path().join("journal.json");
        fs::write(&journal_path, journal_json(&holder, "backpack.open")).unwrap();

        let config = RuntimeConfig::load(&config_path).unwrap();
        let journal = Journal::from_json(&fs::read_to_string(&journal_path).unwrap()).unwrap();
        let (mut event_loop, host) = replay(&config, &journal);

        let stats = event_loop.stats().clone();
        assert_eq!(stats.events, 3);
        assert_eq!(stats.vetoed, 1);
        assert_eq!(stats.persisted, 1);
        assert_eq!(event_loop.status().active_sessions, 0);

        let report = event_loop.shutdown();
        assert_eq!(report.total(), 0);
        assert_eq!(host.count_stacks(is_shulker), 1);
    }

    #[test]
    fn test_replay_respects_configured_permission() {
        let holder = uuid::Uuid::new_v4().to_string();
        let config = RuntimeConfig::parse("[session]\nopen_permission = \"backpack.open\"\n")
            .unwrap();
        let journal =
            Journal::from_json(&journal_json(&holder, "portableshulkerbox.open")).unwrap();

        let (event_loop, _host) = replay(&config, &journal);

        // Never opened, so the held slot change went through
        assert_eq!(event_loop.stats().vetoed, 0);
        assert_eq!(event_loop.stats().persisted, 0);
    }
}
