use super::*;
use phone_shell::shell::{NavError, RefreshPolicy, VisualState};

fn catalog(builds: &Builds) -> Navigator {
    let nav = navigator();
    nav.register_screen(singleton("contacts", builds, RefreshPolicy::Never)).unwrap();
    nav.register_screen(per_contact("conversation", builds)).unwrap();
    nav.register_screen(per_contact("contact_detail", builds)).unwrap();
    nav.register_screen(singleton("settings", builds, RefreshPolicy::Never)).unwrap();
    nav
}

#[tokio::test(start_paused = true)]
async fn test_ancestor_return_collapses_stack() {
    let builds = Builds::default();
    let nav = catalog(&builds);

    nav.navigate_to("contacts", ScreenParams::new()).await.unwrap();
    nav.navigate_to("conversation", contact("k1")).await.unwrap();
    nav.navigate_to("contact_detail", contact("k1")).await.unwrap();
    assert_eq!(nav.current_depth(), 3);

    nav.navigate_to("conversation", contact("k1")).await.unwrap();

    assert_eq!(stack_ids(&nav), vec!["contacts", "conversation:k1"]);
    assert_eq!(nav.current().unwrap().identity, id("conversation:k1"));
    assert_eq!(builds.count(), 3);
    assert_eq!(nav.visual_state(&id("conversation:k1")), Some(VisualState::Active));
}

#[tokio::test(start_paused = true)]
async fn test_same_identity_and_params_is_noop() {
    let builds = Builds::default();
    let nav = catalog(&builds);

    nav.navigate_to("conversation", contact("k1")).await.unwrap();
    nav.navigate_to("conversation", contact("k1")).await.unwrap();
    settle().await;
    nav.navigate_to("conversation", contact("k1")).await.unwrap();

    assert_eq!(nav.current_depth(), 1);
    assert_eq!(builds.count(), 1);
    assert!(!nav.has_pending_transitions());
}

#[tokio::test(start_paused = true)]
async fn test_no_duplicates_for_any_sequence() {
    let builds = Builds::default();
    let nav = catalog(&builds);

    let sequence = [
        ("contacts", None),
        ("conversation", Some("k1")),
        ("settings", None),
        ("conversation", Some("k2")),
        ("contact_detail", Some("k1")),
        ("settings", None),
        ("conversation", Some("k2")),
        ("contacts", None),
        ("conversation", Some("k1")),
        ("contact_detail", Some("k1")),
        ("conversation", Some("k1")),
    ];

    for (screen, contact_id) in sequence {
        let params = contact_id.map(contact).unwrap_or_default();
        nav.navigate_to(screen, params).await.unwrap();
        assert_no_duplicates(&nav);
    }

    assert_eq!(stack_ids(&nav), vec!["contacts", "conversation:k1"]);
}

#[tokio::test(start_paused = true)]
async fn test_ancestor_return_updates_frame_params() {
    let builds = Builds::default();
    let nav = catalog(&builds);

    nav.navigate_to("contacts", ScreenParams::new().with("filter", "all")).await.unwrap();
    nav.navigate_to("settings", ScreenParams::new()).await.unwrap();
    nav.navigate_to("contacts", ScreenParams::new().with("filter", "fav")).await.unwrap();

    let top = nav.current().unwrap();
    assert_eq!(nav.current_depth(), 1);
    assert_eq!(top.params.get_str("filter"), Some("fav"));
    // Never policy: reused as is
    assert_eq!(builds.count(), 2);
    assert_eq!(
        nav.instance(&id("contacts")).unwrap().last_params().get_str("filter"),
        Some("fav")
    );
}

#[tokio::test(start_paused = true)]
async fn test_back_reveals_ancestor_immediately() {
    let builds = Builds::default();
    let nav = catalog(&builds);

    nav.navigate_to("contacts", ScreenParams::new()).await.unwrap();
    settle().await;
    nav.navigate_to("settings", ScreenParams::new()).await.unwrap();
    assert_eq!(nav.visual_state(&id("contacts")), Some(VisualState::Dimmed));
    assert_eq!(nav.visual_state(&id("settings")), Some(VisualState::Entering));

    assert_eq!(nav.navigate_back().await, Some(id("settings")));
    assert_eq!(nav.visual_state(&id("contacts")), Some(VisualState::Active));
    assert_eq!(nav.visual_state(&id("settings")), Some(VisualState::Exiting));

    settle().await;
    assert_eq!(nav.visual_state(&id("settings")), Some(VisualState::Hidden));
    assert_eq!(nav.active_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_back_at_base_is_noop() {
    let builds = Builds::default();
    let nav = catalog(&builds);

    assert_eq!(nav.navigate_back().await, None);
    assert!(nav.is_at_base());
    assert!(nav.base_visible());
}

#[tokio::test(start_paused = true)]
async fn test_find_index() {
    let builds = Builds::default();
    let nav = catalog(&builds);

    nav.navigate_to("contacts", ScreenParams::new()).await.unwrap();
    nav.navigate_to("conversation", contact("k1")).await.unwrap();

    assert_eq!(nav.find_index(&id("contacts")), Some(0));
    assert_eq!(nav.find_index(&id("conversation:k1")), Some(1));
    assert_eq!(nav.find_index(&id("conversation:k2")), None);
}

#[tokio::test(start_paused = true)]
async fn test_programmer_errors_leave_stack_alone() {
    let builds = Builds::default();
    let nav = catalog(&builds);
    nav.navigate_to("contacts", ScreenParams::new()).await.unwrap();

    let err = nav.navigate_to("camera", ScreenParams::new()).await.unwrap_err();
    assert!(matches!(err, NavError::UnknownScreen(ref name) if name == "camera"));

    let err = nav.navigate_to("conversation", ScreenParams::new()).await.unwrap_err();
    assert!(matches!(err, NavError::InvalidParams { ref field, .. } if field == "contact_id"));

    assert_eq!(stack_ids(&nav), vec!["contacts"]);
    assert_eq!(builds.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_branch_returns_to_origin_tab() {
    let builds = Builds::default();
    let nav = catalog(&builds);

    nav.switch_base_tab("recents").unwrap();
    nav.navigate_to("contacts", ScreenParams::new()).await.unwrap();
    nav.navigate_to("settings", ScreenParams::new()).await.unwrap();
    nav.switch_base_tab("dialer").unwrap();

    assert!(nav.stack().iter().all(|frame| frame.origin_base_tab == "recents"));

    nav.navigate_back().await;
    nav.navigate_back().await;
    assert!(nav.is_at_base());
    assert_eq!(nav.active_base_tab(), "recents");
}

#[tokio::test(start_paused = true)]
async fn test_key_values_containing_separator_are_distinct_entities() {
    let builds = Builds::default();
    let nav = navigator();
    nav.register_screen(counting("transfer", &builds, Duration::ZERO).per_entity(["bank", "account"]))
        .unwrap();

    let first = ScreenParams::new().with("bank", "a:b").with("account", "c");
    let second = ScreenParams::new().with("bank", "a").with("account", "b:c");
    nav.navigate_to("transfer", first).await.unwrap();
    nav.navigate_to("transfer", second).await.unwrap();

    assert_eq!(builds.count(), 2);
    assert_eq!(nav.current_depth(), 2);
    assert_no_duplicates(&nav);
}
