//! Horizon Trellis Headless Host
//!
//! Drives a small widget tree without a window:
//! - A row of buttons laid out by a container widget
//! - Focus traversal with Tab
//! - Pointer hover and clicks
//! - A blinking caret driven by a repeating timer
//!
//! Run with: RUST_LOG=horizon_trellis=debug cargo run -p horizon-trellis --example headless

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use horizon_trellis::config::EngineConfig;
use horizon_trellis::prelude::*;

/// Lays its children out left to right with a fixed gap.
struct Row {
    gap: i32,
}

impl WidgetProc for Row {
    fn handle(&self, tree: &mut WidgetTree, id: WidgetId, msg: &mut Message<'_>) -> bool {
        match msg {
            Message::SetPreferredRect => {
                let children: Vec<WidgetId> = tree.children(id).filter(|&c| tree.is_visible(c)).collect();
                let gaps = self.gap * (children.len() as i32 + 1);
                let width = children.iter().map(|&c| tree.width(c)).sum::<i32>() + gaps;
                let height = children.iter().map(|&c| tree.height(c)).max().unwrap_or(0) + 2 * self.gap;
                tree.resize_widget(id, width, height);
                true
            }
            Message::DoLayout => {
                let mut x = self.gap;
                let children: Vec<WidgetId> = tree.children(id).filter(|&c| tree.is_visible(c)).collect();
                for child in children {
                    let (width, height) = (tree.width(child), tree.height(child));
                    tree.set_rect(child, Rect::from_xywh(x, self.gap, width, height));
                    x += width + self.gap;
                }
                true
            }
            _ => default_proc(tree, id, msg),
        }
    }
}

/// A push button that counts its clicks.
struct Button {
    label: &'static str,
    clicks: Cell<u32>,
}

impl Button {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            clicks: Cell::new(0),
        }
    }
}

impl WidgetProc for Button {
    fn handle(&self, tree: &mut WidgetTree, id: WidgetId, msg: &mut Message<'_>) -> bool {
        match msg {
            Message::Paint(paint) => {
                let color = if tree.has_focus(id) {
                    Color::rgb(70, 130, 200)
                } else if tree.has_mouse(id) {
                    Color::rgb(200, 200, 200)
                } else {
                    Color::rgb(160, 160, 160)
                };
                paint.surface.fill_rect(paint.widget_rect, color);
                true
            }
            Message::ButtonUp(mouse) => {
                self.clicks.set(self.clicks.get() + 1);
                tracing::info!(label = self.label, x = mouse.x, y = mouse.y, clicks = self.clicks.get(), "clicked");
                tree.set_focus(id);
                true
            }
            Message::KeyChar(key) if key.key == Key::Enter || key.key == Key::Space => {
                self.clicks.set(self.clicks.get() + 1);
                tracing::info!(label = self.label, clicks = self.clicks.get(), "activated from keyboard");
                true
            }
            Message::GotFocus => {
                tracing::info!(label = self.label, "focused");
                true
            }
            _ => default_proc(tree, id, msg),
        }
    }
}

/// A text caret that blinks while its timer runs.
struct Caret {
    shown: Cell<bool>,
    blinks: Cell<u32>,
}

impl WidgetProc for Caret {
    fn handle(&self, tree: &mut WidgetTree, id: WidgetId, msg: &mut Message<'_>) -> bool {
        match msg {
            Message::Timer(_) => {
                self.shown.set(!self.shown.get());
                self.blinks.set(self.blinks.get() + 1);
                true
            }
            Message::Paint(paint) if self.shown.get() => {
                paint.surface.fill_rect(paint.widget_rect, Color::BLACK);
                true
            }
            _ => default_proc(tree, id, msg),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match EngineConfig::from_toml_str("paint_fallback = { r = 240, g = 240, b = 240, a = 255 }") {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let mut tree = WidgetTree::with_config(config);
    let bounds = Rect::from_xywh(0, 0, 480, 120);
    let root = tree.create_with_class(DefaultProc, "desktop");
    tree.set_rect(root, bounds);

    let row = tree.create_with_class(Row { gap: 8 }, "row");
    tree.set_rect(row, Rect::from_xywh(10, 10, 1, 1));
    tree.add_widget(root, row);

    let buttons: Vec<(Rc<Button>, WidgetId)> = ["Open", "Save", "Quit"]
        .into_iter()
        .map(|label| {
            let button = Rc::new(Button::new(label));
            let id = tree.create_shared(button.clone(), "button");
            tree.set_rect(id, Rect::from_xywh(0, 0, 80, 24));
            tree.add_widget(row, id);
            (button, id)
        })
        .collect();

    let caret = Rc::new(Caret {
        shown: Cell::new(true),
        blinks: Cell::new(0),
    });
    let caret_id = tree.create_shared(caret.clone(), "caret");
    tree.set_rect(caret_id, Rect::from_xywh(10, 80, 2, 16));
    tree.add_widget(root, caret_id);
    tree.start_widget_repeating_timer(caret_id, Duration::from_millis(5));

    let mut surface = RecordingSurface::new(bounds);
    tree.draw(root, &mut surface);
    println!("{}", tree.dump_tree(root));

    let save = buttons[1].1;
    let save_center = tree.screen_rect(save).map_or((0, 0), |r| (r.center_x(), r.center_y()));

    let script = [
        RawEvent::KeyChar {
            key: Key::Tab,
            character: None,
            modifiers: KeyboardModifiers::NONE,
            repeat: false,
        },
        RawEvent::KeyChar {
            key: Key::Enter,
            character: Some('\r'),
            modifiers: KeyboardModifiers::NONE,
            repeat: false,
        },
        RawEvent::MouseAxes {
            x: save_center.0,
            y: save_center.1,
            z: 0,
            w: 0,
            dx: 1,
            dy: 1,
            dz: 0,
            dw: 0,
        },
        RawEvent::MouseButtonDown {
            x: save_center.0,
            y: save_center.1,
            z: 0,
            w: 0,
            button: 1,
        },
        RawEvent::MouseButtonUp {
            x: save_center.0,
            y: save_center.1,
            z: 0,
            w: 0,
            button: 1,
        },
        RawEvent::DisplayExpose { rect: bounds },
    ];

    let started = Instant::now();
    for event in &script {
        let consumed = tree.dispatch_event(root, &mut surface, event);
        tracing::debug!(?event, consumed, "dispatched");
        tree.process_timers(root);
    }
    while started.elapsed() < Duration::from_millis(30) {
        if let Some(wait) = tree.time_until_next_timer() {
            std::thread::sleep(wait);
        }
        tree.process_timers(root);
    }

    for (button, id) in &buttons {
        println!(
            "{:>5}: {} click(s){}",
            button.label,
            button.clicks.get(),
            if tree.has_focus(*id) { " [focus]" } else { "" }
        );
    }
    println!("caret blinked {} time(s)", caret.blinks.get());
    println!("{} fills, {} clip changes", surface.fills.len(), surface.clips.len());

    tree.destroy(root);
    println!("widgets left: {}", tree.len());
}
