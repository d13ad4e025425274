mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use dupe_tree::{CheckState, Mode, NodeRef, SmartSelectPolicy, TreeEvent};

#[test]
fn test_checking_group_then_unchecking_one_file() {
    let mut tree = populated(sized_groups(&[("g", &[10, 20, 30])]));

    assert!(tree.set_check(NodeRef::Group(0), CheckState::Checked, false, false));
    let stats = tree.calculate_stats();
    assert_eq!(stats.wasted_size, 60);
    assert_eq!(stats.file_count, 3);

    assert!(!tree.set_check(NodeRef::File(0, 1), CheckState::Unchecked, false, false));
    let after = tree.calculate_stats();
    assert_eq!(after.wasted_size, 40);
    assert_eq!(after.file_count, stats.file_count - 1);
    assert_eq!(after.total_size, 60);
    assert_eq!(tree.check_state(NodeRef::Group(0)), Some(CheckState::Mixed));
}

#[test]
fn test_up_propagation_stops_at_parent() {
    let mut tree = populated(sized_groups(&[("a", &[1, 1]), ("b", &[1, 1])]));
    tree.set_check(NodeRef::File(0, 0), CheckState::Checked, false, false);
    tree.set_check(NodeRef::File(0, 1), CheckState::Checked, false, false);

    assert_eq!(tree.check_state(NodeRef::Group(0)), Some(CheckState::Checked));
    assert_eq!(tree.check_state(NodeRef::Group(1)), Some(CheckState::Unchecked));
    assert!(tree.at_least_one_top_level_item_checked());
}

#[test]
fn test_toggling_locked_file_is_noop() {
    let mut tree = populated(sized_groups(&[("g", &[5, 5, 5])]));
    tree.toggle(NodeRef::File(0, 0));
    tree.set_locked(0, 0, true);
    let group_before = tree.check_state(NodeRef::Group(0));

    let checked = tree.toggle(NodeRef::File(0, 0));
    assert!(checked);
    assert!(tree.file(0, 0).unwrap().is_checked());
    assert_eq!(tree.check_state(NodeRef::Group(0)), group_before);

    tree.set_check(NodeRef::File(0, 0), CheckState::Unchecked, false, false);
    assert!(tree.file(0, 0).unwrap().is_checked());
}

#[test]
fn test_lock_changes_aggregate() {
    let mut tree = populated(sized_groups(&[("g", &[5, 5])]));
    tree.toggle(NodeRef::File(0, 0));
    assert_eq!(tree.check_state(NodeRef::Group(0)), Some(CheckState::Mixed));

    tree.toggle_lock(0, 1);
    assert!(tree.file(0, 1).unwrap().is_locked());
    assert_eq!(tree.check_state(NodeRef::Group(0)), Some(CheckState::Checked));

    tree.toggle_lock(0, 1);
    assert_eq!(tree.check_state(NodeRef::Group(0)), Some(CheckState::Mixed));
}

#[test]
fn test_sort_by_total_size_keeps_file_order() {
    let mut tree = populated(sized_groups(&[
        ("hundred", &[60, 40]),
        ("fifty", &[25, 25]),
        ("twohundred", &[150, 50]),
    ]));
    let files_before: Vec<Vec<String>> = {
        let mut p = paths(&tree);
        p.sort();
        p
    };

    tree.sort_by_total_size(false);
    let totals: Vec<u64> = tree.groups().map(|g| g.total_size()).collect();
    assert_eq!(totals, vec![200, 100, 50]);

    tree.sort_by_total_size(true);
    let totals: Vec<u64> = tree.groups().map(|g| g.total_size()).collect();
    assert_eq!(totals, vec![50, 100, 200]);

    let mut files_after = paths(&tree);
    files_after.sort();
    assert_eq!(files_after, files_before);
    assert_eq!(paths(&tree)[2], vec!["/twohundred/0", "/twohundred/1"]);
}

#[test]
fn test_single_file_group_is_valid() {
    let tree = populated(sized_groups(&[("solo", &[42])]));
    assert_eq!(tree.group_count(), 1);
    let stats = tree.calculate_stats();
    assert_eq!(stats.group_count, 1);
    assert_eq!(stats.total_size, 42);
    assert_eq!(stats.wasted_size, 0);
}

#[test]
fn test_group_context_actions() {
    let mut tree = populated(sized_groups(&[("a", &[1, 2, 3]), ("b", &[4, 5])]));

    tree.group_select_all(0);
    assert_eq!(tree.check_state(NodeRef::Group(0)), Some(CheckState::Checked));
    assert_eq!(tree.check_state(NodeRef::Group(1)), Some(CheckState::Unchecked));

    tree.toggle(NodeRef::File(0, 2));
    tree.group_invert_selection(0);
    assert_eq!(
        snapshot(&tree)[0],
        vec![CheckState::Unchecked, CheckState::Unchecked, CheckState::Checked]
    );

    tree.group_clear_selection(0);
    assert_eq!(tree.check_state(NodeRef::Group(0)), Some(CheckState::Unchecked));

    tree.group_smart_select(1, SmartSelectPolicy::KeepLastInGroup).unwrap();
    assert_eq!(snapshot(&tree)[1], vec![CheckState::Unchecked, CheckState::Checked]);

    tree.group_exclude(0);
    assert_eq!(tree.group_count(), 1);
    assert_eq!(paths(&tree)[0], vec!["/b/0", "/b/1"]);
}

#[test]
fn test_group_smart_select_rejects_resolution_outside_image_mode() {
    let mut tree = populated(sized_groups(&[("a", &[1, 1])]));
    assert!(tree
        .group_smart_select(0, SmartSelectPolicy::KeepLowestResolution)
        .is_err());

    tree.set_mode(Mode::Images);
    assert!(tree
        .group_smart_select(0, SmartSelectPolicy::KeepLowestResolution)
        .is_ok());
}

#[test]
fn test_user_mutations_emit_stats_changed() {
    let mut tree = populated(sized_groups(&[("a", &[1, 1])]));
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    tree.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    tree.toggle(NodeRef::File(0, 0));
    tree.toggle_lock(0, 1);
    tree.activate(NodeRef::Group(0));
    tree.clear();

    let events = events.borrow();
    assert_eq!(
        *events,
        vec![
            TreeEvent::StatsChanged,
            TreeEvent::StatsChanged,
            TreeEvent::DuplicateSelected {
                primary: "/a/0".into(),
                comparison: "/a/1".into(),
            },
            TreeEvent::StatsChanged,
        ]
    );
    assert!(tree.is_empty());
    assert_eq!(tree.calculate_stats().group_count, 0);
}
