//! Collision merging - overlapping primaries absorb each other.
//!
//! Optional policy, off by default (`SimConfig::merge_enabled`). For every
//! ordered pair of live primaries whose bounds overlap, the heavier body
//! absorbs the lighter one's mass and the lighter one is removed. Removal is
//! tracked in a removed-set so a body absorbed earlier in the pass is never
//! processed again, and the primaries collection is rebuilt only after the
//! scan completes.
//!
//! Secondaries whose parent was absorbed are re-pointed at the survivor, and
//! a focus resting on an absorbed body follows it the same way.

use crate::components::*;
use crate::systems::motion::{BodyOrder, FocusState, SimConfig};
use bevy_ecs::prelude::*;
use std::collections::HashMap;

/// System that runs one merge pass over the primaries collection.
pub fn collision_merge_system(
    mut commands: Commands,
    config: Res<SimConfig>,
    mut order: ResMut<BodyOrder>,
    mut focus: ResMut<FocusState>,
    mut primaries: Query<(&BodyName, &Bounds, &mut Mass), Without<ParentBody>>,
    mut moons: Query<(&BodyName, &mut ParentBody)>,
) {
    if !config.merge_enabled {
        return;
    }

    let scan: Vec<Entity> = order.primaries.clone();
    // Absorbed body -> its absorber.
    let mut removed: HashMap<Entity, Entity> = HashMap::new();

    for &p in &scan {
        if removed.contains_key(&p) {
            continue;
        }
        for &q in &scan {
            if q == p || removed.contains_key(&q) {
                continue;
            }
            let (Ok((_, p_bounds, p_mass)), Ok((_, q_bounds, q_mass))) =
                (primaries.get(p), primaries.get(q))
            else {
                continue;
            };
            if !p_bounds.overlaps(q_bounds) || p_mass.0 <= q_mass.0 {
                continue;
            }
            let absorbed = q_mass.0;
            let Ok((p_name, _, mut mass)) = primaries.get_mut(p) else {
                continue;
            };
            mass.0 += absorbed;
            log::debug!("`{}` absorbed a primary of mass {absorbed}", p_name.0);
            removed.insert(q, p);
        }
    }

    if removed.is_empty() {
        return;
    }

    // A survivor may itself have been absorbed later in the pass; follow
    // the chain to the body that is still alive.
    let resolve = |mut e: Entity| {
        while let Some(&next) = removed.get(&e) {
            e = next;
        }
        e
    };

    for &moon in &order.secondaries {
        let Ok((name, mut parent)) = moons.get_mut(moon) else {
            continue;
        };
        if removed.contains_key(&parent.0) {
            let survivor = resolve(parent.0);
            log::debug!("re-parenting `{}` onto the merge survivor", name.0);
            parent.0 = survivor;
        }
    }

    if let Some(focused) = focus.focused {
        if removed.contains_key(&focused) {
            focus.focused = Some(resolve(focused));
        }
    }

    order.primaries.retain(|e| !removed.contains_key(e));
    for (&gone, _) in &removed {
        commands.entity(gone).despawn();
    }
}
