//! # Session Properties
//!
//! Invariants that must hold for any event stream: one session per holder,
//! lossless round trips, no duplication through drop races, a locked source
//! slot, and faults that act exactly once.

#[cfg(test)]
mod tests {
    use super::super::*;
    use psb_session::domain::SourceSlot;
    use psb_session::events::{
        ClickType, DragEvent, DropItemEvent, HeldSlotChangeEvent, SwapHandsEvent,
    };
    use psb_session::ports::PortableContainerApi;
    use std::collections::BTreeMap;

    // =============================================================================
    // ONE SESSION PER HOLDER
    // =============================================================================

    #[test]
    fn test_repeated_open_gesture_keeps_single_session() {
        let mut h = Harness::with_item(shulker(vec![]));
        h.open();
        let first = h.event_loop.service().session(&h.holder).unwrap().id();
        let first_view = h.host.view_of(h.holder);

        for _ in 0..3 {
            h.open();
        }

        let status = h.event_loop.status();
        assert_eq!(status.active_sessions, 1);
        assert_eq!(status.holders, vec![h.holder]);
        assert_eq!(h.event_loop.service().session(&h.holder).unwrap().id(), first);
        assert_eq!(h.host.view_of(h.holder), first_view);
        assert_eq!(h.event_loop.stats().vetoed, 3);
    }

    #[test]
    fn test_holders_are_independent() {
        let mut h = Harness::with_item(shulker(vec![]));
        let other = h.add_holder(shulker(vec![item("stone", 1)]));

        h.open();
        h.open_for(other);
        assert_eq!(h.event_loop.status().active_sessions, 2);

        h.close();
        let status = h.event_loop.status();
        assert_eq!(status.holders, vec![other]);
    }

    // =============================================================================
    // ROUND TRIP AND EDIT PERSISTENCE
    // =============================================================================

    #[test]
    fn test_open_close_without_edits_preserves_contents() {
        let original = shulker(vec![item("dirt", 1), item("sand", 2), item("gravel", 3)]);
        let mut h = Harness::with_item(original.clone());

        h.open();
        h.close();

        assert_eq!(h.main_hand(), Some(original));
    }

    #[test]
    fn test_drag_edit_is_persisted_on_close() {
        let mut h = Harness::with_item(shulker(vec![item("dirt", 1)]));
        h.open();

        h.send(HostEvent::Drag(DragEvent {
            holder: h.holder,
            top_size: TOP,
            dragged: Some(item("stone", 10)),
            new_items: BTreeMap::from([(1, item("stone", 5)), (2, item("stone", 5))]),
            remaining_cursor: None,
            cancelled: false,
        }));
        h.close();

        let stored = h.stored().unwrap();
        assert_eq!(stored.occupied(), 3);
        assert_eq!(stored.get(1), Some(&item("stone", 5)));
        assert_eq!(stored.get(2), Some(&item("stone", 5)));
    }

    #[test]
    fn test_contents_replaced_wholesale() {
        let mut h = Harness::with_item(shulker(vec![item("dirt", 1), item("sand", 1)]));
        h.open();
        let view = h.host.view_of(h.holder).unwrap();

        h.host.edit_view(view, 0, None);
        h.host.edit_view(view, 1, None);
        h.host.edit_view(view, 26, Some(item("beacon", 1)));
        h.close();

        let stored = h.stored().unwrap();
        assert_eq!(stored.occupied(), 1);
        assert_eq!(stored.get(26), Some(&item("beacon", 1)));
    }

    // =============================================================================
    // NO DUPLICATION ON DROP RACE
    // =============================================================================

    #[test]
    fn test_drop_during_session_closes_without_duplication() {
        let boxed = shulker(vec![item("diamond", 64)]);
        let mut h = Harness::with_item(boxed.clone());
        h.open();

        h.send(HostEvent::DropItem(DropItemEvent {
            holder: h.holder,
            item: boxed.clone(),
            cancelled: false,
        }));

        assert!(h.host.world_drops().is_empty());
        assert!(h.view().is_none());
        assert_eq!(h.event_loop.status().active_sessions, 0);
        assert_eq!(h.shulkers_in_world(), 1);
        assert_eq!(h.main_hand(), Some(boxed));
    }

    #[test]
    fn test_drop_race_with_pending_edit() {
        let mut h = Harness::with_item(shulker(vec![]));
        h.open();
        h.host.set_cursor(h.holder, Some(item("apple", 1)));

        // Click and drop queued back to back, before the loop runs
        h.event_loop
            .submit(HostEvent::Click(ClickEvent::new(h.holder, ClickType::Left, 0, TOP)));
        h.event_loop.submit(HostEvent::DropItem(DropItemEvent {
            holder: h.holder,
            item: h.main_hand().unwrap(),
            cancelled: false,
        }));
        h.event_loop.run_until_idle();

        assert_eq!(h.shulkers_in_world(), 1);
        assert!(h.host.world_drops().is_empty());
        assert_eq!(h.stored().unwrap().get(0), Some(&item("apple", 1)));
    }

    // =============================================================================
    // SOURCE SLOT LOCK
    // =============================================================================

    #[test]
    fn test_source_slot_cannot_move() {
        let mut h = Harness::with_item(shulker(vec![]));
        h.open();

        for new in 1..9 {
            h.send(HostEvent::HeldSlotChange(HeldSlotChangeEvent {
                holder: h.holder,
                previous: 0,
                new,
                cancelled: false,
            }));
        }
        h.send(HostEvent::SwapHands(SwapHandsEvent {
            holder: h.holder,
            cancelled: false,
        }));

        let state = h.host.holder(h.holder).unwrap();
        assert_eq!(state.selected, 0);
        assert!(state.off_hand.is_none());
        assert!(is_shulker(&h.main_hand().unwrap()));
        assert_eq!(h.event_loop.stats().vetoed, 9);
        assert_eq!(
            h.event_loop.service().session(&h.holder).unwrap().slot(),
            SourceSlot::Primary
        );
    }

    #[test]
    fn test_slot_unlocked_after_close() {
        let mut h = Harness::with_item(shulker(vec![]));
        h.open();
        h.close();

        h.send(HostEvent::HeldSlotChange(HeldSlotChangeEvent {
            holder: h.holder,
            previous: 0,
            new: 4,
            cancelled: false,
        }));

        assert_eq!(h.host.holder(h.holder).unwrap().selected, 4);
    }

    // =============================================================================
    // FAULT IDEMPOTENCE
    // =============================================================================

    #[test]
    fn test_fault_acts_once_across_queued_detections() {
        let mut h = Harness::with_item(shulker(vec![]));
        h.open();
        let dirt = item("dirt", 1);
        h.host.set_inventory_item(h.holder, 0, Some(dirt.clone()));

        // Several detections queued before the forced close is delivered
        for raw in [FIRST_INVENTORY_RAW, FIRST_INVENTORY_RAW + 1, 3] {
            h.event_loop
                .submit(HostEvent::Click(ClickEvent::new(h.holder, ClickType::Left, raw, TOP)));
        }
        h.event_loop.run_until_idle();
        h.close();

        assert_eq!(h.event_loop.status().active_sessions, 0);
        // The detecting click and both clicks still queued against the view
        assert_eq!(h.event_loop.stats().vetoed, 3);
        assert_eq!(h.event_loop.stats().persisted, 0);
        assert_eq!(h.main_hand(), Some(dirt));
        assert!(h.view().is_none());
        assert!(h.host.holder(h.holder).unwrap().cursor.is_none());
    }

    #[test]
    fn test_faulted_view_cannot_be_emptied_before_close() {
        let diamonds = item("diamond", 64);
        let boxed = shulker(vec![diamonds.clone()]);
        let mut h = Harness::with_item(boxed.clone());
        h.open();

        // Box moved out of the main hand behind the session's back
        h.host.set_inventory_item(h.holder, 0, None);
        h.host.set_inventory_item(h.holder, 20, Some(boxed));
        h.event_loop
            .submit(HostEvent::Click(ClickEvent::new(h.holder, ClickType::Left, FIRST_INVENTORY_RAW, TOP)));
        h.event_loop
            .submit(HostEvent::Click(ClickEvent::new(h.holder, ClickType::Left, 0, TOP)));
        h.event_loop.run_until_idle();

        let is_diamond = |stack: &ItemStack| stack.kind.as_str() == "minecraft:diamond";
        assert_eq!(h.host.count_stacks(is_diamond), 0);
        let moved = h.host.holder(h.holder).unwrap().inventory[20].clone().unwrap();
        assert_eq!(embedded(&moved).unwrap().get(0), Some(&diamonds));
        assert_eq!(h.event_loop.stats().vetoed, 2);
        assert!(h.view().is_none());

        // Free again once the view is gone
        h.send(HostEvent::SwapHands(SwapHandsEvent {
            holder: h.holder,
            cancelled: false,
        }));
        assert_eq!(h.event_loop.stats().vetoed, 2);
    }

    #[test]
    fn test_overfilled_box_is_left_untouched() {
        let over = ItemStack::new("minecraft:shulker_box", 1).with_meta(ItemMeta::container(
            Contents::with_entries(30, (0..30).map(|_| item("dirt", 1))),
        ));
        let mut h = Harness::with_item(over.clone());

        h.open();
        h.close();

        assert!(h.view().is_none());
        assert_eq!(h.event_loop.status().active_sessions, 0);
        assert_eq!(h.main_hand(), Some(over));
        assert_eq!(h.stored().unwrap().occupied(), 30);
    }

    // =============================================================================
    // SHUTDOWN
    // =============================================================================

    #[test]
    fn test_shutdown_saves_reachable_and_abandons_gone_holders() {
        let mut h = Harness::with_item(shulker(vec![]));
        let gone = h.add_holder(shulker(vec![]));
        h.open();
        h.open_for(gone);
        h.host.edit_view(h.host.view_of(h.holder).unwrap(), 0, Some(item("clay", 4)));
        h.host.set_online(gone, false);

        let report = h.event_loop.shutdown();

        assert_eq!(report.persisted, vec![h.holder]);
        assert_eq!(report.abandoned, vec![gone]);
        assert_eq!(h.event_loop.status().active_sessions, 0);
        assert_eq!(h.stored().unwrap().get(0), Some(&item("clay", 4)));
        assert!(h.view().is_none());
    }

    // =============================================================================
    // LIVE LOOP
    // =============================================================================

    #[tokio::test]
    async fn test_live_loop_saves_edits_before_exit() {
        let Harness {
            mut event_loop,
            host,
            holder,
        } = Harness::with_item(shulker(vec![]));
        let sender = event_loop.sender();
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
        host.set_cursor(holder, Some(item("bread", 2)));

        let runner = tokio::spawn(async move {
            let report = event_loop.run(shutdown_rx).await;
            (report, event_loop)
        });
        sender.host_event(HostEvent::Interact(InteractEvent::open_gesture(holder)));
        sender.host_event(HostEvent::Click(ClickEvent::new(holder, ClickType::Left, 0, TOP)));
        shutdown_tx.send(true).unwrap();

        let (report, event_loop) = runner.await.unwrap();
        assert_eq!(report.persisted, vec![holder]);
        assert_eq!(event_loop.status().active_sessions, 0);
        let stored = embedded(&host.hand_item(&holder, SourceSlot::Primary).unwrap()).unwrap();
        assert_eq!(stored.get(0), Some(&item("bread", 2)));
        assert!(host.view_of(holder).is_none());
    }
}
