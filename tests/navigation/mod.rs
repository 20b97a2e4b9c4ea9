pub mod refresh;
pub mod stack_semantics;
pub mod teardown;

use anyhow::anyhow;
use phone_shell::config::ShellConfig;
use phone_shell::shell::{
    factory_fn, Navigator, RefreshPolicy, ScreenDescriptor, ScreenIdentity, ScreenParams, ViewFragment,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Comfortably past the default settle delay
pub const PAST_SETTLE: Duration = Duration::from_millis(350);

/// Shared factory call counter
#[derive(Clone, Default)]
pub struct Builds(Arc<AtomicUsize>);

impl Builds {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn navigator() -> Navigator {
    Navigator::new(&ShellConfig::default())
}

/// Factory that counts calls and optionally takes `delay` to finish
pub fn counting(name: &str, builds: &Builds, delay: Duration) -> ScreenDescriptor {
    let builds = builds.clone();
    let tag = name.to_string();
    ScreenDescriptor::new(
        name,
        factory_fn(move |params: ScreenParams| {
            let builds = builds.clone();
            let tag = tag.clone();
            async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                builds.bump();
                if params.get_str("mode") == Some("broken") {
                    return Err(anyhow!("{} backend unavailable", tag));
                }
                Ok(ViewFragment::new(tag))
            }
        }),
    )
}

/// Instant singleton with the given policy
pub fn singleton(name: &str, builds: &Builds, policy: RefreshPolicy) -> ScreenDescriptor {
    counting(name, builds, Duration::ZERO).refresh_policy(policy)
}

/// Instant per-contact screen
pub fn per_contact(name: &str, builds: &Builds) -> ScreenDescriptor {
    counting(name, builds, Duration::ZERO).per_entity(["contact_id"])
}

pub fn failing(name: &str) -> ScreenDescriptor {
    ScreenDescriptor::new(
        name,
        factory_fn(|_params| async { Err(anyhow!("bank service unreachable")) }),
    )
}

pub fn contact(id: &str) -> ScreenParams {
    ScreenParams::new().with("contact_id", id)
}

pub fn id(identity: &str) -> ScreenIdentity {
    ScreenIdentity::from(identity)
}

pub fn stack_ids(navigator: &Navigator) -> Vec<String> {
    navigator
        .stack()
        .iter()
        .map(|frame| frame.identity.to_string())
        .collect()
}

pub fn assert_no_duplicates(navigator: &Navigator) {
    let ids = stack_ids(navigator);
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "duplicate frames in {:?}", ids);
}

pub async fn settle() {
    tokio::time::sleep(PAST_SETTLE).await;
}
