//! Outcome negotiation
//!
//! Combines the source-declared `effectAllowed` with the target-declared
//! `dropEffect` into the single operation a drag resolves to.

use crate::transfer::{DropEffect, EffectAllowed};

/// Default drop effect proposed to a target before it has spoken.
///
/// `effect_allowed` of `None` means the source never initialized it; the
/// outcome then depends on whether the source is a hyperlink-type node.
pub fn default_drop_effect(
    effect_allowed: Option<EffectAllowed>,
    source_is_link: bool,
) -> DropEffect {
    match effect_allowed {
        None => {
            if source_is_link {
                DropEffect::Link
            } else {
                DropEffect::Copy
            }
        }
        Some(EffectAllowed::None) => DropEffect::None,
        Some(
            EffectAllowed::Copy
            | EffectAllowed::CopyLink
            | EffectAllowed::CopyMove
            | EffectAllowed::All,
        ) => DropEffect::Copy,
        Some(EffectAllowed::Link | EffectAllowed::LinkMove) => DropEffect::Link,
        Some(EffectAllowed::Move) => DropEffect::Move,
    }
}

/// Negotiate the operation a target's `dropEffect` resolves to under the
/// source's `effectAllowed`. An uninitialized or `all` allowance passes the
/// drop effect through unchanged.
pub fn negotiate_drop_effect(
    effect_allowed: Option<EffectAllowed>,
    drop_effect: DropEffect,
) -> DropEffect {
    let allowed = match effect_allowed {
        None | Some(EffectAllowed::All) => return drop_effect,
        Some(allowed) => allowed,
    };
    match drop_effect {
        DropEffect::Copy
            if matches!(
                allowed,
                EffectAllowed::Copy | EffectAllowed::CopyLink | EffectAllowed::CopyMove
            ) =>
        {
            DropEffect::Copy
        }
        DropEffect::Link
            if matches!(
                allowed,
                EffectAllowed::Link | EffectAllowed::LinkMove | EffectAllowed::CopyLink
            ) =>
        {
            DropEffect::Link
        }
        DropEffect::Move
            if matches!(
                allowed,
                EffectAllowed::Move | EffectAllowed::CopyMove | EffectAllowed::LinkMove
            ) =>
        {
            DropEffect::Move
        }
        _ => DropEffect::None,
    }
}
