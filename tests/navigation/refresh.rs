use super::*;
use phone_shell::shell::{RefreshPolicy, VisualState};

fn viewer(builds: &Builds, policy: RefreshPolicy) -> Navigator {
    let nav = navigator();
    nav.register_screen(singleton("viewer", builds, policy).keyed_on(["item"]))
        .unwrap();
    nav.register_screen(singleton("settings", builds, RefreshPolicy::Never)).unwrap();
    nav
}

fn item(key: &str) -> ScreenParams {
    ScreenParams::new().with("item", key)
}

#[tokio::test(start_paused = true)]
async fn test_never_reuses_across_key_changes() {
    let builds = Builds::default();
    let nav = viewer(&builds, RefreshPolicy::Never);

    for key in ["k1", "k2", "k1"] {
        nav.navigate_to("viewer", item(key)).await.unwrap();
    }

    let instance = nav.instance(&id("viewer")).unwrap();
    assert_eq!(builds.count(), 1);
    assert_eq!(instance.view().revision(), 0);
    assert_eq!(instance.last_params(), &item("k1"));
    assert_eq!(nav.current_depth(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_on_entity_change_rebuilds_in_place() {
    let builds = Builds::default();
    let nav = viewer(&builds, RefreshPolicy::OnEntityChange);

    nav.navigate_to("viewer", item("k1")).await.unwrap();
    let first = nav.instance(&id("viewer")).unwrap().id();

    for key in ["k2", "k1"] {
        nav.navigate_to("viewer", item(key)).await.unwrap();
    }

    let instance = nav.instance(&id("viewer")).unwrap();
    assert_eq!(builds.count(), 3);
    assert_eq!(instance.id(), first);
    assert_eq!(instance.view().revision(), 2);
    assert_eq!(nav.current().unwrap().params, item("k1"));
    assert_eq!(nav.current_depth(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_on_entity_change_ignores_other_fields() {
    let builds = Builds::default();
    let nav = viewer(&builds, RefreshPolicy::OnEntityChange);

    nav.navigate_to("viewer", item("k1").with("scroll", 0)).await.unwrap();
    nav.navigate_to("viewer", item("k1").with("scroll", 40)).await.unwrap();

    assert_eq!(builds.count(), 1);
    assert_eq!(nav.current().unwrap().params.get("scroll"), Some(&serde_json::json!(40)));
}

#[tokio::test(start_paused = true)]
async fn test_always_rebuilds_on_changed_params() {
    let builds = Builds::default();
    let nav = viewer(&builds, RefreshPolicy::Always);

    nav.navigate_to("viewer", item("k1")).await.unwrap();
    nav.navigate_to("viewer", item("k1").with("scroll", 3)).await.unwrap();
    assert_eq!(builds.count(), 2);

    // Identical params on top stay a no-op
    nav.navigate_to("viewer", item("k1").with("scroll", 3)).await.unwrap();
    assert_eq!(builds.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_on_ancestor_return() {
    let builds = Builds::default();
    let nav = viewer(&builds, RefreshPolicy::OnEntityChange);

    nav.navigate_to("viewer", item("k1")).await.unwrap();
    nav.navigate_to("settings", ScreenParams::new()).await.unwrap();
    settle().await;

    nav.navigate_to("viewer", item("k2")).await.unwrap();

    assert_eq!(stack_ids(&nav), vec!["viewer"]);
    assert_eq!(builds.count(), 3);
    assert_eq!(nav.instance(&id("viewer")).unwrap().view().revision(), 1);
    assert_eq!(nav.visual_state(&id("viewer")), Some(VisualState::Active));
}

#[tokio::test(start_paused = true)]
async fn test_rebuild_keeps_visual_state() {
    let builds = Builds::default();
    let nav = viewer(&builds, RefreshPolicy::OnEntityChange);

    nav.navigate_to("viewer", item("k1")).await.unwrap();
    settle().await;
    nav.navigate_to("viewer", item("k2")).await.unwrap();

    assert_eq!(nav.visual_state(&id("viewer")), Some(VisualState::Active));
    assert!(!nav.has_pending_transitions());
}

#[tokio::test(start_paused = true)]
async fn test_on_entity_change_entity_screen_rebuilds_after_pop() {
    let builds = Builds::default();
    let nav = navigator();
    nav.register_screen(per_contact("conversation", &builds).refresh_policy(RefreshPolicy::OnEntityChange))
        .unwrap();

    let mut seen = Vec::new();
    for key in ["k1", "k2", "k1"] {
        nav.navigate_to("conversation", contact(key)).await.unwrap();
        let instance = nav.instance(&id(&format!("conversation:{}", key))).unwrap();
        assert!(!seen.contains(&instance.id()));
        seen.push(instance.id());

        assert_eq!(nav.navigate_back().await, Some(id(&format!("conversation:{}", key))));
        settle().await;
        assert!(nav.instance(&id(&format!("conversation:{}", key))).is_none());
    }

    assert_eq!(builds.count(), 3);
    assert_eq!(nav.cached_count(), 0);
    assert!(nav.is_at_base());
}
