use super::*;

fn id(s: &str) -> EntityId {
    EntityId::from(s)
}

fn last_selected(notifier: &mut Notifier) -> Option<Vec<EntityId>> {
    notifier.drain().into_iter().rev().find_map(|a| match a {
        Action::SelectionChanged { mut selected } => {
            selected.sort();
            Some(selected)
        }
        _ => None,
    })
}

#[test]
fn select_replaces() {
    let (mut sel, mut n) = (Selection::new(), Notifier::default());
    sel.add([id("a"), id("b")], &mut n);
    sel.select(id("c"), &mut n);
    assert_eq!(last_selected(&mut n), Some(vec![id("c")]));
    assert!(!sel.contains(&id("a")));
    assert_eq!(sel.len(), 1);
}

#[test]
fn add_extends() {
    let (mut sel, mut n) = (Selection::new(), Notifier::default());
    sel.select(id("a"), &mut n);
    sel.add([id("b")], &mut n);
    assert_eq!(last_selected(&mut n), Some(vec![id("a"), id("b")]));
}

#[test]
fn toggle_flips_membership() {
    let (mut sel, mut n) = (Selection::new(), Notifier::default());
    sel.toggle(id("a"), &mut n);
    assert!(sel.contains(&id("a")));
    sel.toggle(id("a"), &mut n);
    assert!(!sel.has_selection());
    assert_eq!(last_selected(&mut n), Some(vec![]));
}

#[test]
fn clear_notifies_only_when_non_empty() {
    let (mut sel, mut n) = (Selection::new(), Notifier::default());
    sel.clear(&mut n);
    assert!(n.is_empty());

    sel.select(id("a"), &mut n);
    n.drain();
    sel.clear(&mut n);
    assert_eq!(last_selected(&mut n), Some(vec![]));
}

#[test]
fn forget_is_silent() {
    let (mut sel, mut n) = (Selection::new(), Notifier::default());
    sel.add([id("a"), id("b")], &mut n);
    n.drain();
    assert!(sel.forget(&id("a")));
    assert!(!sel.forget(&id("zzz")));
    assert!(n.is_empty());
    assert_eq!(sel.selected_ids(), vec![id("b")]);
}

#[test]
fn replace_swaps_whole_set() {
    let (mut sel, mut n) = (Selection::new(), Notifier::default());
    sel.add([id("a"), id("b")], &mut n);
    sel.replace([id("c"), id("d")], &mut n);
    assert_eq!(last_selected(&mut n), Some(vec![id("c"), id("d")]));
}
