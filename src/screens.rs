//! Demo screen catalog.
//!
//! Stub feature screens used by the CLI to drive the navigator. Their
//! factories only produce small placeholder fragments.

use anyhow::bail;

use crate::shell::{factory_fn, NavError, Navigator, RefreshPolicy, ScreenDescriptor, ScreenParams, ViewFragment};

/// Register every demo screen on `navigator`
pub fn register_demo_screens(navigator: &Navigator) -> Result<(), NavError> {
    for descriptor in demo_screens() {
        navigator.register_screen(descriptor)?;
    }
    Ok(())
}

pub fn demo_screens() -> Vec<ScreenDescriptor> {
    vec![
        ScreenDescriptor::new(
            "contacts",
            factory_fn(|params: ScreenParams| async move {
                let filter = params.get_str("filter").unwrap_or("all").to_string();
                Ok(ViewFragment::new("list").child(ViewFragment::text("filter", filter)))
            }),
        )
        .title("Contacts"),
        ScreenDescriptor::new(
            "conversation",
            factory_fn(|params: ScreenParams| async move {
                let contact = params.get_str("contact_id").unwrap_or_default().to_string();
                Ok(ViewFragment::new("thread")
                    .child(ViewFragment::text("header", contact))
                    .child(ViewFragment::new("composer")))
            }),
        )
        .title("Messages")
        .per_entity(["contact_id"]),
        ScreenDescriptor::new(
            "contact_detail",
            factory_fn(|params: ScreenParams| async move {
                let contact = params.get_str("contact_id").unwrap_or_default().to_string();
                let section = params.get_str("section").unwrap_or("info").to_string();
                Ok(ViewFragment::new("detail")
                    .child(ViewFragment::text("name", contact))
                    .child(ViewFragment::text("section", section)))
            }),
        )
        .title("Contact")
        .per_entity(["contact_id"])
        .keyed_on(["section"])
        .refresh_policy(RefreshPolicy::OnEntityChange),
        ScreenDescriptor::new(
            "wallet",
            factory_fn(|params: ScreenParams| async move {
                if params.get("offline").and_then(|v| v.as_bool()).unwrap_or(false) {
                    bail!("bank service unreachable");
                }
                Ok(ViewFragment::new("wallet").child(ViewFragment::text("balance", "$0.00")))
            }),
        )
        .title("Wallet")
        .refresh_policy(RefreshPolicy::Always),
        ScreenDescriptor::new(
            "settings",
            factory_fn(|_params| async { Ok(ViewFragment::new("settings")) }),
        )
        .title("Settings"),
        ScreenDescriptor::new(
            "help",
            factory_fn(|params: ScreenParams| async move {
                let topic = params.get_str("topic").unwrap_or("index").to_string();
                Ok(ViewFragment::new("article").child(ViewFragment::text("topic", topic)))
            }),
        )
        .title("Help")
        .keyed_on(["topic"])
        .refresh_policy(RefreshPolicy::OnEntityChange),
    ]
}
