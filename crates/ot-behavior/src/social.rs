//! Conversations between workers.
//!
//! Two workers on a break who come into contact stop and talk for a fixed
//! while.  A manager walking past a conversation breaks it up and sends both
//! back to work.

use tracing::debug;

use ot_core::WorkerId;

use crate::{Ctx, Worker};

/// Borrow two distinct workers from the same slice.
fn pair_mut(workers: &mut [Worker], a: WorkerId, b: WorkerId) -> Option<(&mut Worker, &mut Worker)> {
    let (i, j) = (a.index(), b.index());
    if i == j || i >= workers.len() || j >= workers.len() {
        return None;
    }
    if i < j {
        let (lo, hi) = workers.split_at_mut(j);
        Some((&mut lo[i], &mut hi[0]))
    } else {
        let (lo, hi) = workers.split_at_mut(i);
        Some((&mut hi[0], &mut lo[j]))
    }
}

/// Workers `a` and `b` came into contact.  If both are on a break they start
/// talking.  Returns `true` if a conversation started.
pub fn start_conversation(workers: &mut [Worker], a: WorkerId, b: WorkerId, ctx: &mut Ctx<'_>) -> bool {
    let Some((wa, wb)) = pair_mut(workers, a, b) else {
        return false;
    };
    if !(wa.can_socialize() && wb.can_socialize()) {
        return false;
    }
    let chance = ctx.tuning.talk_chance;
    if ctx.rngs.get_mut(wa.body).draw() > chance {
        return false;
    }
    debug!(%a, %b, "conversation started");
    wa.talk_to(b, ctx);
    wb.talk_to(a, ctx);
    true
}

/// A manager came into contact with worker `id`.  If the worker is talking,
/// both it and its partner go back to work.  Returns `true` if a
/// conversation was broken up.
pub fn interrupt_conversation(workers: &mut [Worker], id: WorkerId, ctx: &mut Ctx<'_>) -> bool {
    let Some(worker) = workers.get_mut(id.index()) else {
        return false;
    };
    if !worker.is_talking() {
        return false;
    }
    let partner = worker.partner();
    worker.return_to_work(ctx);
    debug!(worker = %id, ?partner, "conversation interrupted");

    let Some(partner) = partner else { return true };
    if let Some(other) = workers.get_mut(partner.index()) {
        if other.is_talking() && other.partner() == Some(id) {
            other.return_to_work(ctx);
        }
    }
    true
}
