// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rotary walkthrough: rotate, nudge, and nudge back across two windows.
//!
//! The scene is a media app with a menu column and a content area, plus a
//! system bar window along the bottom. Each input is resolved by a
//! `Navigator`, and the "host" then records the new focus the way a real
//! toolkit integration would after performing the focus action.
//!
//! Run:
//! - `cargo run -p understory_demos --example rotary_walkthrough`
//! - `RUST_LOG=debug cargo run -p understory_demos --example rotary_walkthrough` to see
//!   the navigator's decisions.

use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_event_state::pending::PendingFocus;
use understory_focus::{Direction, TabDirection};
use understory_rotary::{
    Navigator, NavigatorConfig, NodeId, NodeSpec, Snapshot, SnapshotError, WindowId, WindowKind,
};

const APP: WindowId = WindowId(1);
const BAR: WindowId = WindowId(2);

/// Build the scene. Node keys double as labels.
fn scene() -> Result<Snapshot<&'static str>, SnapshotError> {
    let mut b = Snapshot::builder();

    let screen = Rect::new(0.0, 0.0, 800.0, 400.0);
    let app = b.add_window(APP, WindowKind::Application, screen, NodeSpec::new("app", screen))?;
    b.add_child(
        app,
        NodeSpec::focus_parking_view("parking", Rect::new(0.0, 0.0, 1.0, 1.0)),
    )?;
    let menu = b.add_child(
        app,
        NodeSpec::focus_area("menu", Rect::new(0.0, 0.0, 200.0, 400.0)),
    )?;
    for (i, label) in (0_u32..).zip(["home", "library", "search", "settings"]) {
        let y = f64::from(i) * 100.0;
        b.add_child(menu, NodeSpec::view(label, Rect::new(0.0, y, 200.0, y + 100.0)))?;
    }
    let content = b.add_child(
        app,
        NodeSpec::focus_area("content", Rect::new(200.0, 0.0, 800.0, 400.0)),
    )?;
    for (i, label) in (0_u32..).zip(["album 1", "album 2", "album 3"]) {
        let x = 200.0 + f64::from(i) * 200.0;
        b.add_child(
            content,
            NodeSpec::view(label, Rect::new(x, 100.0, x + 200.0, 300.0)),
        )?;
    }

    let bar_bounds = Rect::new(0.0, 400.0, 800.0, 480.0);
    let bar = b.add_window(BAR, WindowKind::System, bar_bounds, NodeSpec::new("bar", bar_bounds))?;
    for (i, label) in (0_u32..).zip(["volume", "climate"]) {
        let x = f64::from(i) * 400.0;
        b.add_child(bar, NodeSpec::view(label, Rect::new(x, 400.0, x + 400.0, 480.0)))?;
    }

    Ok(b.build())
}

fn name_of(snapshot: &Snapshot<&'static str>, id: Option<NodeId>) -> &'static str {
    id.and_then(|id| snapshot.get(id)).map_or("(nothing)", |n| n.key())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let snapshot = scene()?;
    let app_root = snapshot.window(APP).ok_or("no app window")?.root();

    let mut nav = Navigator::new(NavigatorConfig::default())?;
    let mut pending = PendingFocus::with_timeout(500);
    let mut now = 0_u64;

    // Start with the first focusable control of the app window.
    let mut focused = nav
        .find_first_focus_descendant(&snapshot, app_root)
        .ok_or("app has nothing to focus")?;
    nav.save_focused_node(&snapshot, focused, now);
    tracing::info!(focus = name_of(&snapshot, Some(focused)), "initial focus");

    // Rotate clockwise by three detents.
    now += 100;
    if let Some(target) = nav.find_rotate_target(&snapshot, focused, None, TabDirection::Forward, 3) {
        tracing::info!(
            from = name_of(&snapshot, Some(focused)),
            to = name_of(&snapshot, Some(target.node)),
            advanced = target.advanced,
            "rotate"
        );
        focused = target.node;
        nav.save_focused_node(&snapshot, focused, now);
    }

    // A nudge right enters the content area, a nudge down the system bar.
    for direction in [Direction::Right, Direction::Down, Direction::Up, Direction::Left] {
        now += 100;
        let target = nav.find_nudge_target(&snapshot, focused, direction, None, now);
        tracing::info!(
            ?direction,
            from = name_of(&snapshot, Some(focused)),
            to = name_of(&snapshot, target),
            "nudge"
        );
        let Some(target) = target else {
            continue;
        };
        // A second identical request before the toolkit confirms is a no-op.
        if pending.insert(target, now) {
            focused = target;
            pending.remove(&target, now + 10);
            nav.save_focused_node(&snapshot, focused, now + 10);
        }
    }

    let recent = nav.most_recent_focus(&snapshot, Some(BAR), now);
    tracing::info!(bar = name_of(&snapshot, recent), "most recent focus in the system bar");
    Ok(())
}
