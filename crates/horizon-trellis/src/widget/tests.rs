//! Whole-engine tests for the widget system.

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use horizon_trellis_core::Rect;

    use crate::config::EngineConfig;
    use crate::widget::{
        Color, DefaultProc, Key, KeyboardModifiers, Message, RawEvent, RecordingSurface, Surface, WidgetId,
        WidgetProc, WidgetTree, default_proc,
    };

    /// Everything the recorders observed, in order.
    #[derive(Default)]
    struct Journal {
        messages: Vec<String>,
        paints: Vec<(&'static str, Rect, Rect)>,
        pointer: Vec<(&'static str, i32, i32)>,
    }

    type SharedJournal = Rc<RefCell<Journal>>;

    impl Journal {
        /// Messages whose name is one of `names`, as `widget:message`.
        fn only(&self, names: &[&str]) -> Vec<String> {
            self.messages
                .iter()
                .filter(|entry| entry.split_once(':').is_some_and(|(_, name)| names.contains(&name)))
                .cloned()
                .collect()
        }
    }

    /// A widget that records what it receives.
    struct Recorder {
        name: &'static str,
        journal: SharedJournal,
        refuse_lose_focus: Cell<bool>,
        accept_drag: bool,
        consume_input: bool,
    }

    impl Recorder {
        fn new(name: &'static str, journal: &SharedJournal) -> Self {
            Self {
                name,
                journal: journal.clone(),
                refuse_lose_focus: Cell::new(false),
                accept_drag: false,
                consume_input: false,
            }
        }

        fn consuming(mut self) -> Self {
            self.consume_input = true;
            self
        }

        fn drag_source(mut self) -> Self {
            self.accept_drag = true;
            self
        }
    }

    impl WidgetProc for Recorder {
        fn handle(&self, tree: &mut WidgetTree, id: WidgetId, msg: &mut Message<'_>) -> bool {
            {
                let mut journal = self.journal.borrow_mut();
                journal.messages.push(format!("{}:{}", self.name, msg.name()));
                match msg {
                    Message::Paint(paint) => journal.paints.push((self.name, paint.widget_rect, paint.paint_rect)),
                    Message::ButtonDown(m) | Message::MouseEnter(m) => journal.pointer.push((self.name, m.x, m.y)),
                    _ => {}
                }
            }

            match msg {
                Message::LoseFocus(reply) if self.refuse_lose_focus.get() => {
                    reply.reject();
                    true
                }
                Message::BeginDrag(reply) if self.accept_drag => {
                    reply.accept();
                    true
                }
                Message::KeyDown(_)
                | Message::KeyChar(_)
                | Message::MouseEnter(_)
                | Message::MouseMove(_)
                | Message::MouseLeave(_)
                | Message::ButtonDown(_)
                | Message::ButtonUp(_)
                | Message::DragEnter(_)
                | Message::Drop(_)
                    if self.consume_input =>
                {
                    true
                }
                _ => default_proc(tree, id, msg),
            }
        }
    }

    /// Packs its visible children left to right: width is the sum of the
    /// children's widths, height the tallest child, both plus the border.
    struct HBox {
        border: i32,
        arranged: Cell<u32>,
    }

    impl HBox {
        fn new(border: i32) -> Self {
            Self {
                border,
                arranged: Cell::new(0),
            }
        }
    }

    impl WidgetProc for HBox {
        fn handle(&self, tree: &mut WidgetTree, id: WidgetId, msg: &mut Message<'_>) -> bool {
            match msg {
                Message::SetPreferredRect => {
                    let children: Vec<WidgetId> = tree.children(id).filter(|&c| tree.is_visible(c)).collect();
                    let width: i32 = children.iter().map(|&c| tree.width(c)).sum();
                    let height = children.iter().map(|&c| tree.height(c)).max().unwrap_or(0);
                    tree.resize_widget(id, width + 2 * self.border, height + 2 * self.border);
                    true
                }
                Message::DoLayout => {
                    self.arranged.set(self.arranged.get() + 1);
                    let inner = tree.height(id) - 2 * self.border;
                    let children: Vec<WidgetId> = tree.children(id).filter(|&c| tree.is_visible(c)).collect();
                    let mut x = self.border;
                    for child in children {
                        let width = tree.width(child);
                        tree.set_rect(child, Rect::from_xywh(x, self.border, width, inner));
                        x += width;
                    }
                    true
                }
                _ => default_proc(tree, id, msg),
            }
        }
    }

    fn setup() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn screen() -> RecordingSurface {
        RecordingSurface::new(Rect::from_xywh(0, 0, 640, 480))
    }

    fn mouse_to(x: i32, y: i32) -> RawEvent {
        RawEvent::MouseAxes {
            x,
            y,
            z: 0,
            w: 0,
            dx: 1,
            dy: 0,
            dz: 0,
            dw: 0,
        }
    }

    fn key_char(key: Key, modifiers: KeyboardModifiers) -> RawEvent {
        RawEvent::KeyChar {
            key,
            character: None,
            modifiers,
            repeat: false,
        }
    }

    /// Root 640x480 with a recorder child A at (100, 50) sized 250x200.
    fn root_with_child(journal: &SharedJournal) -> (WidgetTree, WidgetId, WidgetId) {
        let mut tree = WidgetTree::new();
        let root = tree.create(Recorder::new("root", journal));
        tree.set_rect(root, Rect::from_xywh(0, 0, 640, 480));
        let a = tree.create(Recorder::new("A", journal));
        tree.set_rect(a, Rect::from_xywh(100, 50, 250, 200));
        assert!(tree.add_widget(root, a));
        (tree, root, a)
    }

    /// Local and screen rects of the whole subtree, in pre-order.
    fn snapshot(tree: &WidgetTree, root: WidgetId) -> Vec<(Rect, Rect)> {
        tree.nodes
            .preorder(root)
            .into_iter()
            .map(|id| (tree.rect(id).unwrap(), tree.screen_rect(id).unwrap()))
            .collect()
    }

    // =========================================================================
    // Tree structure
    // =========================================================================

    #[test]
    fn test_insert_rejects_cycles() {
        setup();
        let mut tree = WidgetTree::new();
        let root = tree.create(DefaultProc);
        let a = tree.create(DefaultProc);
        let b = tree.create(DefaultProc);

        assert!(!tree.add_widget(a, a));
        assert!(tree.add_widget(root, a));
        assert!(tree.add_widget(a, b));
        // Already parented.
        assert!(!tree.add_widget(root, b));
        // Would make root its own descendant.
        assert!(!tree.add_widget(b, root));

        assert_eq!(tree.parent(b), Some(a));
        assert_eq!(tree.parent(root), None);
        assert!(tree.is_ancestor(root, b));
    }

    #[test]
    fn test_insert_before_and_z_order() {
        let mut tree = WidgetTree::new();
        let root = tree.create(DefaultProc);
        let a = tree.create(DefaultProc);
        let b = tree.create(DefaultProc);
        let c = tree.create(DefaultProc);
        tree.add_widget(root, a);
        tree.add_widget(root, b);
        assert!(tree.insert_widget(root, c, Some(b)));

        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![a, c, b]);
        assert_eq!(tree.z_order(c), 1);
        assert_eq!(tree.tab_order(c), 2);
    }

    #[test]
    fn test_destroy_cleans_up_subtree() {
        setup();
        let journal = SharedJournal::default();
        let (mut tree, root, a) = root_with_child(&journal);
        let c = tree.create(Recorder::new("C", &journal));
        tree.add_widget(a, c);
        journal.borrow_mut().messages.clear();

        tree.destroy(a);

        assert_eq!(
            journal.borrow().only(&["cleanup", "remove-widget"]),
            vec!["A:cleanup", "C:cleanup", "root:remove-widget"]
        );
        assert!(!tree.contains(a));
        assert!(!tree.contains(c));
        assert_eq!(tree.child_count(root), 0);
        assert_eq!(tree.len(), 1);
    }

    // =========================================================================
    // Layout
    // =========================================================================

    fn hbox_scenario(border: i32) -> (WidgetTree, WidgetId, WidgetId, Vec<WidgetId>) {
        let mut tree = WidgetTree::new();
        let root = tree.create(DefaultProc);
        tree.set_rect(root, Rect::from_xywh(0, 0, 640, 480));
        let hbox = tree.create_with_class(HBox::new(border), "hbox");
        tree.set_rect(hbox, Rect::from_xywh(0, 0, 1, 1));
        tree.add_widget(root, hbox);

        let leaves = [40, 60, 80]
            .into_iter()
            .map(|height| {
                let leaf = tree.create(DefaultProc);
                tree.set_rect(leaf, Rect::from_xywh(0, 0, 50, height));
                tree.add_widget(hbox, leaf);
                leaf
            })
            .collect();
        (tree, root, hbox, leaves)
    }

    #[test]
    fn test_container_measures_and_arranges() {
        setup();
        let (mut tree, root, hbox, leaves) = hbox_scenario(0);
        tree.draw(root, &mut screen());

        assert_eq!(tree.width(hbox), 150);
        assert_eq!(tree.height(hbox), 80);
        for (i, &leaf) in leaves.iter().enumerate() {
            assert_eq!(tree.rect(leaf), Some(Rect::from_xywh(50 * i as i32, 0, 50, 80)));
        }
    }

    #[test]
    fn test_container_border() {
        let (mut tree, root, hbox, leaves) = hbox_scenario(4);
        tree.move_widget(hbox, 10, 20);
        tree.layout(root);

        assert_eq!(tree.rect(hbox), Some(Rect::from_xywh(10, 20, 158, 88)));
        assert_eq!(tree.rect(leaves[1]), Some(Rect::from_xywh(54, 4, 50, 80)));
        assert_eq!(tree.screen_rect(leaves[1]), Some(Rect::from_xywh(64, 24, 50, 80)));
    }

    #[test]
    fn test_layout_is_idempotent() {
        let (mut tree, root, _, _) = hbox_scenario(2);
        tree.layout(root);
        let first = snapshot(&tree, root);
        tree.layout(root);
        assert_eq!(snapshot(&tree, root), first);
    }

    #[test]
    fn test_set_rect_inside_layout_does_not_reenter() {
        let mut tree = WidgetTree::new();
        let root = tree.create(DefaultProc);
        let hbox = Rc::new(HBox::new(0));
        let container = tree.create_shared(hbox.clone(), "hbox");
        tree.add_widget(root, container);
        for _ in 0..3 {
            let leaf = tree.create(DefaultProc);
            tree.set_rect(leaf, Rect::from_xywh(0, 0, 10, 10));
            tree.add_widget(container, leaf);
        }

        tree.draw(root, &mut screen());
        // One arrange pass, despite three set-rects issued from inside it.
        assert_eq!(hbox.arranged.get(), 1);
        assert!(!tree.is_in_layout(container));
        assert!(!tree.is_layout_managed(container));
    }

    #[test]
    fn test_insert_into_displayed_container_relayouts() {
        let (mut tree, root, hbox, _) = hbox_scenario(0);
        tree.draw(root, &mut screen());

        let extra = tree.create(DefaultProc);
        tree.set_rect(extra, Rect::from_xywh(0, 0, 30, 10));
        assert!(tree.add_widget(hbox, extra));

        assert_eq!(tree.width(hbox), 180);
        assert_eq!(tree.rect(extra), Some(Rect::from_xywh(150, 0, 30, 80)));
        assert!(tree.is_drawn(extra));
    }

    #[test]
    fn test_pack_widget_after_child_resize() {
        let (mut tree, root, hbox, leaves) = hbox_scenario(0);
        tree.draw(root, &mut screen());

        tree.resize_widget(leaves[0], 70, 80);
        tree.pack_widget(hbox);

        assert_eq!(tree.width(hbox), 170);
        assert_eq!(tree.x(leaves[1]), 70);
        assert_eq!(tree.screen_rect(leaves[2]).map(|r| r.left), Some(120));
    }

    #[test]
    fn test_hiding_a_child_relayouts_the_parent() {
        let (mut tree, root, hbox, leaves) = hbox_scenario(0);
        tree.draw(root, &mut screen());

        assert!(tree.hide(leaves[0]));
        assert_eq!(tree.width(hbox), 100);
        assert_eq!(tree.x(leaves[1]), 0);
        assert!(!tree.is_visible_in_tree(leaves[0]));
    }

    // =========================================================================
    // Paint
    // =========================================================================

    #[test]
    fn test_paint_whole_tree() {
        setup();
        let journal = SharedJournal::default();
        let (mut tree, root, _) = root_with_child(&journal);
        let mut surface = screen();

        tree.draw(root, &mut surface);

        let paints = journal.borrow().paints.clone();
        assert_eq!(
            paints,
            vec![
                ("root", Rect::from_xywh(0, 0, 640, 480), Rect::from_xywh(0, 0, 640, 480)),
                ("A", Rect::from_xywh(100, 50, 250, 200), Rect::from_xywh(100, 50, 250, 200)),
            ]
        );
        // The caller's clip is restored.
        assert_eq!(surface.clip(), Rect::from_xywh(0, 0, 640, 480));
    }

    #[test]
    fn test_first_draw_lays_out_before_painting() {
        let journal = SharedJournal::default();
        let mut tree = WidgetTree::new();
        let root = tree.create_with_class(HBox::new(0), "hbox");
        let leaf = tree.create(Recorder::new("leaf", &journal));
        tree.set_rect(leaf, Rect::from_xywh(0, 0, 50, 40));
        tree.add_widget(root, leaf);

        // The root starts empty; the first layout sizes it around the leaf.
        tree.draw(root, &mut screen());

        assert_eq!(tree.rect(root), Some(Rect::from_xywh(0, 0, 50, 40)));
        assert_eq!(
            journal.borrow().paints,
            vec![("leaf", Rect::from_xywh(0, 0, 50, 40), Rect::from_xywh(0, 0, 50, 40))]
        );
    }

    #[test]
    fn test_paint_skips_disjoint_subtrees() {
        let journal = SharedJournal::default();
        let (mut tree, root, a) = root_with_child(&journal);
        let outside = tree.create(Recorder::new("outside", &journal));
        tree.set_rect(outside, Rect::from_xywh(700, 500, 10, 10));
        tree.add_widget(root, outside);
        let nested = tree.create(Recorder::new("nested", &journal));
        tree.set_rect(nested, Rect::from_xywh(0, 0, 5, 5));
        tree.add_widget(outside, nested);

        // Only the top-left corner of the root.
        tree.draw_rect(root, Rect::from_xywh(0, 0, 50, 50), &mut screen());

        let painted: Vec<&str> = journal.borrow().paints.iter().map(|p| p.0).collect();
        assert_eq!(painted, vec!["root"]);

        journal.borrow_mut().paints.clear();
        tree.draw(root, &mut screen());
        let painted: Vec<&str> = journal.borrow().paints.iter().map(|p| p.0).collect();
        assert_eq!(painted, vec!["root", "A"]);
        assert!(tree.is_drawn(a));
    }

    #[test]
    fn test_hidden_widgets_are_not_painted() {
        let journal = SharedJournal::default();
        let (mut tree, root, a) = root_with_child(&journal);
        assert!(tree.hide(a));
        tree.draw(root, &mut screen());
        let painted: Vec<&str> = journal.borrow().paints.iter().map(|p| p.0).collect();
        assert_eq!(painted, vec!["root"]);
    }

    #[test]
    fn test_paint_fallback_fills_clipped_rect() {
        let config = EngineConfig::new().with_paint_fallback(Some(Color::WHITE));
        let mut tree = WidgetTree::with_config(config);
        let root = tree.create(DefaultProc);
        tree.set_rect(root, Rect::from_xywh(0, 0, 100, 100));
        let mut surface = RecordingSurface::new(Rect::from_xywh(0, 0, 100, 100));

        tree.draw_rect(root, Rect::from_xywh(10, 10, 20, 20), &mut surface);

        assert_eq!(surface.fills, vec![(Rect::from_xywh(10, 10, 20, 20), Color::WHITE)]);
    }

    // =========================================================================
    // Focus
    // =========================================================================

    #[test]
    fn test_set_focus_notification_order() {
        setup();
        let journal = SharedJournal::default();
        let (mut tree, root, a) = root_with_child(&journal);
        let b = tree.create(Recorder::new("B", &journal));
        tree.add_widget(root, b);

        assert!(tree.set_focus(a));
        journal.borrow_mut().messages.clear();

        assert!(tree.set_focus(b));
        assert!(!tree.has_focus(a));
        assert!(tree.has_focus(b));
        assert_eq!(
            journal.borrow().only(&["get-focus", "lose-focus", "lost-focus", "got-focus"]),
            vec!["B:get-focus", "A:lose-focus", "A:lost-focus", "B:got-focus"]
        );
    }

    #[test]
    fn test_focus_requires_enabled_and_visible() {
        let journal = SharedJournal::default();
        let (mut tree, root, a) = root_with_child(&journal);
        let b = tree.create(DefaultProc);
        let c = tree.create(DefaultProc);
        tree.add_widget(root, b);
        tree.add_widget(root, c);
        assert!(tree.set_focus(a));

        assert!(tree.disable(b));
        assert!(tree.hide(c));
        assert!(!tree.set_focus(b));
        assert!(!tree.set_focus(c));
        assert_eq!(tree.focus_widget(root), Some(a));
        assert_eq!(tree.nodes.preorder(root).iter().filter(|&&w| tree.has_focus(w)).count(), 1);
    }

    #[test]
    fn test_lose_focus_veto() {
        let journal = SharedJournal::default();
        let mut tree = WidgetTree::new();
        let root = tree.create(DefaultProc);
        let holder = Rc::new(Recorder::new("holder", &journal));
        let a = tree.create_shared(holder.clone(), "recorder");
        let b = tree.create(Recorder::new("B", &journal));
        tree.add_widget(root, a);
        tree.add_widget(root, b);
        assert!(tree.set_focus(a));

        holder.refuse_lose_focus.set(true);
        assert!(!tree.set_focus(b));
        assert!(tree.has_focus(a));
        assert!(!tree.has_focus(b));
        assert!(journal.borrow().only(&["got-focus"]).iter().all(|e| e != "B:got-focus"));

        // Hiding or disabling the holder (or an ancestor) is refused too.
        assert!(!tree.hide(a));
        assert!(!tree.disable(a));
        assert!(!tree.hide(root));
        assert!(tree.is_visible(a) && tree.is_enabled(a));

        holder.refuse_lose_focus.set(false);
        assert!(tree.set_focus(b));
    }

    #[test]
    fn test_inserting_a_focused_subtree_keeps_one_holder() {
        let mut tree = WidgetTree::new();
        let root = tree.create(DefaultProc);
        tree.set_rect(root, Rect::from_xywh(0, 0, 100, 100));
        let a = tree.create(DefaultProc);
        tree.add_widget(root, a);
        tree.draw(root, &mut screen());
        assert!(tree.set_focus(a));

        let stray = tree.create(DefaultProc);
        assert!(tree.set_focus(stray));
        assert!(tree.add_widget(root, stray));

        assert_eq!(tree.focus_widget(root), Some(a));
        assert!(!tree.has_focus(stray));
    }

    // =========================================================================
    // Capture and drag
    // =========================================================================

    #[test]
    fn test_capture_ordering() {
        let mut tree = WidgetTree::new();
        let root = tree.create(DefaultProc);
        let x = tree.create(DefaultProc);
        let y = tree.create(DefaultProc);
        tree.add_widget(root, x);
        tree.add_widget(root, y);

        assert!(tree.capture(x));
        assert!(tree.capture(y));
        assert_eq!(tree.capture_widget(root), y);
        assert!(tree.release(y));
        assert_eq!(tree.capture_widget(root), x);
        assert!(!tree.release(y));
        assert_eq!(tree.capture_widget(root), x);
    }

    #[test]
    fn test_drag_exclusivity() {
        let journal = SharedJournal::default();
        let mut tree = WidgetTree::new();
        let root = tree.create(DefaultProc);
        let s1 = tree.create(Recorder::new("S1", &journal).drag_source());
        let s2 = tree.create(Recorder::new("S2", &journal).drag_source());
        tree.add_widget(root, s1);
        tree.add_widget(root, s2);

        assert!(tree.begin_drag_and_drop(s1));
        assert!(!tree.begin_drag_and_drop(s2));
        assert!(!tree.begin_drag_and_drop(s1));
        assert!(!tree.end_drag_and_drop(s2));
        assert_eq!(tree.drag_source(root), Some(s1));

        assert!(tree.end_drag_and_drop(s1));
        assert_eq!(journal.borrow().only(&["drag-ended"]), vec!["S1:drag-ended"]);
        assert!(tree.begin_drag_and_drop(s2));
    }

    // =========================================================================
    // Event dispatch
    // =========================================================================

    #[test]
    fn test_pointer_enter_move_leave() {
        setup();
        let journal = SharedJournal::default();
        let mut tree = WidgetTree::new();
        let root = tree.create(Recorder::new("root", &journal));
        tree.set_rect(root, Rect::from_xywh(0, 0, 200, 200));
        let a = tree.create(Recorder::new("A", &journal).consuming());
        tree.set_rect(a, Rect::from_xywh(10, 10, 50, 50));
        tree.add_widget(root, a);
        let mut surface = RecordingSurface::new(Rect::from_xywh(0, 0, 200, 200));
        tree.draw(root, &mut surface);
        journal.borrow_mut().messages.clear();

        assert!(tree.dispatch_event(root, &mut surface, &mouse_to(20, 25)));
        assert!(tree.has_mouse(a));
        assert!(tree.dispatch_event(root, &mut surface, &mouse_to(21, 25)));
        tree.dispatch_event(root, &mut surface, &mouse_to(150, 150));
        assert!(!tree.has_mouse(a));
        assert!(tree.has_mouse(root));

        assert_eq!(
            journal.borrow().only(&["mouse-enter", "mouse-move", "mouse-leave"]),
            vec!["A:mouse-enter", "A:mouse-move", "A:mouse-leave", "root:mouse-enter"]
        );
        // Local coordinates of the first enter.
        assert_eq!(journal.borrow().pointer[0], ("A", 10, 15));
    }

    #[test]
    fn test_buttons_follow_hit_test_and_capture() {
        let journal = SharedJournal::default();
        let mut tree = WidgetTree::new();
        let root = tree.create(Recorder::new("root", &journal));
        tree.set_rect(root, Rect::from_xywh(0, 0, 200, 200));
        let a = tree.create(Recorder::new("A", &journal).consuming());
        tree.set_rect(a, Rect::from_xywh(10, 10, 50, 50));
        tree.add_widget(root, a);
        let b = tree.create(Recorder::new("B", &journal).consuming());
        tree.set_rect(b, Rect::from_xywh(100, 100, 50, 50));
        tree.add_widget(root, b);
        let mut surface = screen();
        tree.draw(root, &mut surface);

        let press = |x, y, button| RawEvent::MouseButtonDown { x, y, z: 0, w: 0, button };
        assert!(tree.dispatch_event(root, &mut surface, &press(25, 30, 1)));
        assert!(!tree.dispatch_event(root, &mut surface, &press(25, 30, 4)));

        // B captures: a press over A now lands on B.
        assert!(tree.capture(b));
        assert!(tree.dispatch_event(root, &mut surface, &press(25, 30, 2)));

        let journal = journal.borrow();
        assert_eq!(journal.only(&["button-down"]), vec!["A:button-down", "B:button-down"]);
        assert_eq!(journal.pointer, vec![("A", 15, 20), ("B", -75, -70)]);
    }

    #[test]
    fn test_keys_go_to_focus_then_unused_then_navigation() {
        let journal = SharedJournal::default();
        let mut tree = WidgetTree::new();
        let root = tree.create(Recorder::new("root", &journal));
        let a = tree.create(Recorder::new("A", &journal));
        let b = tree.create(Recorder::new("B", &journal).consuming());
        tree.add_widget(root, a);
        tree.add_widget(root, b);
        let mut surface = screen();

        // B consumes its keys.
        assert!(tree.set_focus(b));
        let down = RawEvent::KeyDown {
            key: Key::Enter,
            modifiers: KeyboardModifiers::NONE,
        };
        assert!(tree.dispatch_event(root, &mut surface, &down));

        // A does not: the key goes unused to every enabled widget, then
        // Shift+Tab moves focus back to B.
        assert!(tree.set_focus(a));
        journal.borrow_mut().messages.clear();
        let up = RawEvent::KeyUp {
            key: Key::Enter,
            modifiers: KeyboardModifiers::NONE,
        };
        assert!(!tree.dispatch_event(root, &mut surface, &up));
        assert_eq!(
            journal.borrow().only(&["key-up", "unused-key-up"]),
            vec!["A:key-up", "root:unused-key-up", "A:unused-key-up", "B:unused-key-up"]
        );

        assert!(tree.dispatch_event(root, &mut surface, &key_char(Key::Tab, KeyboardModifiers::SHIFT)));
        assert_eq!(tree.focus_widget(root), Some(root));
        assert!(tree.dispatch_event(root, &mut surface, &key_char(Key::Right, KeyboardModifiers::NONE)));
        assert_eq!(tree.focus_widget(root), Some(a));
    }

    #[test]
    fn test_navigation_can_be_disabled() {
        let mut tree = WidgetTree::with_config(
            EngineConfig::new()
                .with_tab_navigation(false)
                .with_arrow_navigation(false),
        );
        let root = tree.create(DefaultProc);
        let a = tree.create(DefaultProc);
        tree.add_widget(root, a);
        let mut surface = screen();

        assert!(!tree.dispatch_event(root, &mut surface, &key_char(Key::Tab, KeyboardModifiers::NONE)));
        assert!(!tree.dispatch_event(root, &mut surface, &key_char(Key::Down, KeyboardModifiers::NONE)));
        assert_eq!(tree.focus_widget(root), None);
    }

    #[test]
    fn test_drag_session_through_dispatch() {
        setup();
        let journal = SharedJournal::default();
        let mut tree = WidgetTree::new();
        let root = tree.create(Recorder::new("root", &journal));
        tree.set_rect(root, Rect::from_xywh(0, 0, 200, 200));
        let source = tree.create(Recorder::new("S", &journal).drag_source());
        tree.set_rect(source, Rect::from_xywh(0, 0, 20, 20));
        tree.add_widget(root, source);
        let target = tree.create(Recorder::new("T", &journal).consuming());
        tree.set_rect(target, Rect::from_xywh(100, 100, 50, 50));
        tree.add_widget(root, target);
        let mut surface = screen();
        tree.draw(root, &mut surface);

        assert!(tree.begin_drag_and_drop(source));
        journal.borrow_mut().messages.clear();

        let press = RawEvent::MouseButtonDown {
            x: 110,
            y: 110,
            z: 0,
            w: 0,
            button: 1,
        };
        assert!(!tree.dispatch_event(root, &mut surface, &press));
        assert!(tree.dispatch_event(root, &mut surface, &mouse_to(110, 110)));
        tree.dispatch_event(root, &mut surface, &key_char(Key::Escape, KeyboardModifiers::NONE));
        let release = RawEvent::MouseButtonUp {
            x: 110,
            y: 110,
            z: 0,
            w: 0,
            button: 1,
        };
        assert!(tree.dispatch_event(root, &mut surface, &release));

        assert_eq!(
            journal.borrow().only(&["button-down", "drag-enter", "drag-key-char", "drop", "drag-ended"]),
            vec!["T:drag-enter", "T:drag-key-char", "T:drop", "S:drag-ended"]
        );
        assert_eq!(tree.drag_source(root), None);
    }

    #[test]
    fn test_drop_with_unknown_button_still_ends_drag() {
        let journal = SharedJournal::default();
        let mut tree = WidgetTree::new();
        let root = tree.create(Recorder::new("root", &journal));
        tree.set_rect(root, Rect::from_xywh(0, 0, 200, 200));
        let source = tree.create(Recorder::new("S", &journal).drag_source());
        tree.set_rect(source, Rect::from_xywh(0, 0, 20, 20));
        tree.add_widget(root, source);
        let target = tree.create(Recorder::new("T", &journal).consuming());
        tree.set_rect(target, Rect::from_xywh(100, 100, 50, 50));
        tree.add_widget(root, target);
        let mut surface = screen();
        tree.draw(root, &mut surface);
        assert!(tree.begin_drag_and_drop(source));
        journal.borrow_mut().messages.clear();

        let release = RawEvent::MouseButtonUp {
            x: 110,
            y: 110,
            z: 0,
            w: 0,
            button: 4,
        };
        assert!(!tree.dispatch_event(root, &mut surface, &release));

        assert_eq!(journal.borrow().only(&["drop", "drag-ended"]), vec!["S:drag-ended"]);
        assert_eq!(tree.drag_source(root), None);
    }

    #[test]
    fn test_display_events() {
        let journal = SharedJournal::default();
        let (mut tree, root, a) = root_with_child(&journal);
        let mut surface = screen();
        tree.draw(root, &mut surface);
        assert!(tree.set_focus(a));
        journal.borrow_mut().messages.clear();
        journal.borrow_mut().paints.clear();

        assert!(tree.dispatch_event(root, &mut surface, &RawEvent::DisplaySwitchOut));
        assert_eq!(tree.focus_widget(root), None);
        assert!(!tree.dispatch_event(root, &mut surface, &RawEvent::DisplaySwitchOut));
        assert!(!tree.dispatch_event(root, &mut surface, &RawEvent::DisplaySwitchIn));
        assert!(!tree.dispatch_event(root, &mut surface, &RawEvent::DisplayClose));

        let expose = RawEvent::DisplayExpose {
            rect: Rect::from_xywh(0, 0, 50, 50),
        };
        assert!(tree.dispatch_event(root, &mut surface, &expose));
        let resize = RawEvent::DisplayResize {
            rect: Rect::from_xywh(0, 0, 800, 600),
        };
        tree.dispatch_event(root, &mut surface, &resize);

        let journal = journal.borrow();
        assert_eq!(
            journal.only(&["lose-focus", "lost-focus", "paint", "display-resized"]),
            vec!["A:lose-focus", "A:lost-focus", "root:paint", "root:display-resized"]
        );
        assert_eq!(journal.paints[0].2, Rect::from_xywh(0, 0, 50, 50));
    }

    #[test]
    fn test_switch_out_respects_focus_veto() {
        let journal = SharedJournal::default();
        let mut tree = WidgetTree::new();
        let root = tree.create(DefaultProc);
        tree.set_rect(root, Rect::from_xywh(0, 0, 640, 480));
        let holder = Rc::new(Recorder::new("holder", &journal));
        let a = tree.create_shared(holder.clone(), "recorder");
        tree.add_widget(root, a);
        let mut surface = screen();
        tree.draw(root, &mut surface);
        assert!(tree.set_focus(a));

        holder.refuse_lose_focus.set(true);
        assert!(!tree.dispatch_event(root, &mut surface, &RawEvent::DisplaySwitchOut));
        assert_eq!(tree.focus_widget(root), Some(a));

        holder.refuse_lose_focus.set(false);
        assert!(tree.dispatch_event(root, &mut surface, &RawEvent::DisplaySwitchOut));
        assert_eq!(tree.focus_widget(root), None);
    }

    #[test]
    fn test_timer_event_reaches_owner() {
        let journal = SharedJournal::default();
        let (mut tree, root, a) = root_with_child(&journal);
        let timer = tree
            .start_widget_repeating_timer(a, std::time::Duration::from_millis(1))
            .unwrap();
        let mut surface = screen();

        assert!(tree.dispatch_event(root, &mut surface, &RawEvent::Timer { timer }));
        assert_eq!(journal.borrow().only(&["timer"]), vec!["A:timer"]);
    }

    #[test]
    fn test_skin_and_translation_reach_the_subtree() {
        let journal = SharedJournal::default();
        let (mut tree, root, a) = root_with_child(&journal);
        let nested = tree.create(Recorder::new("nested", &journal));
        tree.add_widget(a, nested);
        journal.borrow_mut().messages.clear();

        let skin = crate::widget::MemorySkin::new();
        let translation = std::collections::HashMap::<String, String>::new();
        assert!(!tree.apply_skin(a, &skin));
        assert!(!tree.apply_translation(root, &translation));

        assert_eq!(
            journal.borrow().only(&["set-skin", "set-translation"]),
            vec![
                "A:set-skin",
                "nested:set-skin",
                "root:set-translation",
                "A:set-translation",
                "nested:set-translation"
            ]
        );
    }

    #[test]
    fn test_dump_tree() {
        let journal = SharedJournal::default();
        let (tree, root, _) = root_with_child(&journal);
        let dump = tree.dump_tree(root);
        assert_eq!(dump.lines().count(), 2);
        assert!(dump.contains("(100, 50, 250x200)"));
    }
}
