//! Press/release transition on a headless card, printed frame by frame.
//!
//! Run with `RUST_LOG=debug` to see batch and resolver logging.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use cue::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

fn main() {
    env_logger::init();

    let host = HeadlessHost::new();
    let ctx = Rc::new(DispatchContext::new(host.clone()));

    let card = Rc::new(RefCell::new(host.layer().with_controlled_actions(action_table! {
        "press" => {
            "opacity" => AnimationSpec::ease_in_out(Duration::from_millis(150)),
            "scale" => AnimationSpec::spring(300.0, 20.0),
        },
        "release" => {
            "opacity" => AnimationSpec::linear(Duration::from_millis(100)),
            "scale" => AnimationSpec::spring(200.0, 10.0),
        },
    })));
    {
        let mut card = card.borrow_mut();
        card.set_immediate("opacity", 1.0);
        card.set_immediate("scale", 1.0);
    }

    let release_ctx = ctx.clone();
    let release_card = card.clone();
    ctx.animate_then(
        ["press"],
        || {
            let mut card = card.borrow_mut();
            card.set("opacity", 0.6);
            card.set("scale", 0.9);
            // Not configured for "press": jumps without animating
            card.set("corner_radius", 12.0);
        },
        move || {
            println!("-- pressed, releasing");
            release_ctx.animate(["release"], || {
                let mut card = release_card.borrow_mut();
                card.set("opacity", 1.0);
                card.set("scale", 1.0);
            });
        },
    );

    let mut frame = 0;
    while host.in_flight() > 0 || host.pending_completions() > 0 {
        host.advance(FRAME);
        frame += 1;
        let card = card.borrow();
        println!(
            "frame {:3}  t={:>5}ms  opacity={:.3}  scale={:.3}  corner_radius={:.1}",
            frame,
            host.now().as_millis(),
            card.presentation("opacity"),
            card.presentation("scale"),
            card.presentation("corner_radius"),
        );
    }
}
