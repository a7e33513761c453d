//! Frame driver behavior and randomized tree mutation.

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use rand::{Rng, SeedableRng, rngs::StdRng};
    use trellis::{
        Canvas, FrameInput, NodeContext,
        component::Hooks,
        config::CanvasConfig,
        constraint::{AnchorConstraint, BoxConstraint, Constraint},
        error::{Error, Result},
        geom::{Inset, Vec2},
        interaction::ButtonInput,
        layout::{FlowLayout, HorizontalLayout, Layout, VerticalLayout},
        scroll::ScrollableAxis,
        testing::{Harness, init_logging},
    };

    /// A random constraint.
    fn constraint(rng: &mut StdRng) -> Constraint {
        if rng.random_bool(0.8) {
            BoxConstraint {
                size_ratio: Vec2::new(rng.random_range(0.0..0.5), rng.random_range(0.0..0.5)),
                size_delta: Vec2::new(rng.random_range(0.0..80.0), rng.random_range(0.0..80.0)),
                margin: Inset::all(rng.random_range(0.0..4.0)),
                flexible_weight: if rng.random_bool(0.2) { 1.0 } else { 0.0 },
                ..BoxConstraint::default()
            }
            .into()
        } else {
            AnchorConstraint::stretch(Inset::all(rng.random_range(0.0..10.0))).into()
        }
    }

    /// A random layout.
    fn layout(rng: &mut StdRng) -> Layout {
        match rng.random_range(0..3) {
            0 => FlowLayout::default().into(),
            1 => HorizontalLayout {
                spacing: rng.random_range(0.0..5.0),
                ..HorizontalLayout::default()
            }
            .into(),
            _ => VerticalLayout {
                spacing: rng.random_range(0.0..5.0),
                ..VerticalLayout::default()
            }
            .into(),
        }
    }

    /// Apply one random structural or settings change.
    fn mutate(canvas: &mut Canvas, rng: &mut StdRng) -> Result<()> {
        let live = canvas.subtree(canvas.root());
        let target = live[rng.random_range(0..live.len())];
        match rng.random_range(0..8) {
            0 | 1 => {
                let id = canvas.create_node_with("n", constraint(rng), layout(rng));
                canvas.add_child(target, id)?;
            }
            2 if target != canvas.root() => canvas.remove_subtree(target)?,
            3 if target != canvas.root() => canvas.set_active(target, rng.random_bool(0.5))?,
            4 => canvas.set_scrollable(target, ScrollableAxis::BOTH)?,
            5 => canvas.set_clipping_enabled(target, rng.random_bool(0.5))?,
            6 => canvas.set_interactable(target, rng.random_bool(0.7))?,
            _ => {
                let other = live[rng.random_range(0..live.len())];
                match canvas.detach(other) {
                    Ok(()) | Err(Error::CannotRemoveRoot) => {}
                    Err(e) => return Err(e),
                }
                match canvas.add_child(target, other) {
                    Ok(())
                    | Err(
                        Error::AttachToSelf(_)
                        | Error::WouldCreateCycle { .. }
                        | Error::AlreadyAttached(_)
                        | Error::CannotRemoveRoot,
                    ) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(())
    }

    #[test]
    fn random_trees_survive_frames() -> Result<()> {
        init_logging();
        let mut rng = StdRng::seed_from_u64(0x7e11);
        let mut canvas = Canvas::new(Vec2::new(640.0, 480.0));
        for step in 0..400 {
            mutate(&mut canvas, &mut rng)?;
            let down = rng.random_bool(0.1);
            let input = FrameInput {
                cursor: Vec2::new(rng.random_range(0.0..640.0), rng.random_range(0.0..480.0)),
                left: if down { ButtonInput::DOWN } else { ButtonInput::HELD },
                right: ButtonInput::default(),
                wheel: Vec2::new(0.0, rng.random_range(-1.0..1.0)),
            };
            canvas.update(&input, 1.0 / 60.0)?;
            if step % 50 == 0 {
                canvas.update(&FrameInput { left: ButtonInput::UP, ..input }, 1.0 / 60.0)?;
            }
            for item in canvas.draw_order() {
                assert!(item.rect.is_finite());
                assert!(item.rect.w >= 0.0 && item.rect.h >= 0.0);
            }
        }
        assert_eq!(canvas.frame_count(), 408);
        Ok(())
    }

    #[test]
    fn passes_run_in_order() -> Result<()> {
        let mut h = Harness::new(Vec2::new(100.0, 100.0));
        let root = h.root();
        let log = Rc::new(RefCell::new(Vec::new()));
        let record = |name: &'static str| {
            let log = log.clone();
            move |_: &mut NodeContext<'_>| {
                log.borrow_mut().push(name);
                Ok(())
            }
        };
        let hooks = Hooks::new()
            .with_late_update(record("late"))
            .with_update(record("update"))
            .with_update_input(record("input"));
        let n = h.canvas.create_node("n");
        h.canvas.add_child(root, n)?;
        h.canvas.add_component(n, hooks)?;
        h.frame()?;
        assert_eq!(*log.borrow(), vec!["input", "update", "late"]);
        Ok(())
    }

    #[test]
    fn input_pass_visits_topmost_first() -> Result<()> {
        let mut h = Harness::new(Vec2::new(100.0, 100.0));
        let root = h.root();
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["back", "front"] {
            let n = h.canvas.create_node(name);
            h.canvas.add_child(root, n)?;
            let log = log.clone();
            h.canvas.add_component(
                n,
                Hooks::new()
                    .with_update_input({
                        let log = log.clone();
                        move |_| {
                            log.borrow_mut().push(format!("input {name}"));
                            Ok(())
                        }
                    })
                    .with_update(move |_| {
                        log.borrow_mut().push(format!("update {name}"));
                        Ok(())
                    }),
            )?;
        }
        h.frame()?;
        assert_eq!(
            *log.borrow(),
            vec!["input front", "input back", "update back", "update front"]
        );
        Ok(())
    }

    #[test]
    fn late_update_sees_fresh_layout() -> Result<()> {
        let mut h = Harness::new(Vec2::new(200.0, 200.0));
        let root = h.root();
        let grow = h.canvas.create_node_with(
            "grow",
            BoxConstraint::fixed(10.0, 10.0).into(),
            Layout::default(),
        );
        h.canvas.add_child(root, grow)?;
        let seen = Rc::new(RefCell::new(0.0));
        let width = seen.clone();
        h.canvas.add_component(
            grow,
            Hooks::new()
                .with_update(|ctx| {
                    let id = ctx.node_id();
                    ctx.canvas_mut()
                        .set_box_constraint(id, BoxConstraint::fixed(60.0, 10.0))
                })
                .with_late_update(move |ctx| {
                    *width.borrow_mut() = ctx.node()?.rect().w;
                    Ok(())
                }),
        )?;
        h.frame()?;
        assert_eq!(*seen.borrow(), 60.0);
        Ok(())
    }

    #[test]
    fn hook_errors_abort_the_frame() -> Result<()> {
        let mut h = Harness::new(Vec2::new(100.0, 100.0));
        let root = h.root();
        let n = h.canvas.create_node("n");
        h.canvas.add_child(root, n)?;
        h.canvas
            .add_component(n, Hooks::new().with_update(|ctx| ctx.fail("broken")))?;
        assert_eq!(h.frame(), Err(Error::Component("broken".into())));
        assert_eq!(h.canvas.frame_count(), 0);
        Ok(())
    }

    #[test]
    fn config_tunes_wheel_speed() -> Result<()> {
        let config = CanvasConfig::from_json_str(r#"{ "wheel_scroll_speed": 10.0 }"#)?;
        let canvas = Canvas::new(Vec2::new(200.0, 200.0)).with_config(config);
        let mut h = Harness::with_canvas(canvas);
        let root = h.root();
        let list = h.canvas.create_node_with(
            "list",
            BoxConstraint::fixed(100.0, 100.0).into(),
            VerticalLayout::default().into(),
        );
        h.canvas.add_child(root, list)?;
        h.canvas.set_scrollable(list, ScrollableAxis::VERTICAL)?;
        let item = h.canvas.create_node_with(
            "item",
            BoxConstraint::fixed(100.0, 300.0).into(),
            Layout::default(),
        );
        h.canvas.add_child(list, item)?;
        h.move_to(Vec2::new(10.0, 10.0))?;
        h.wheel(Vec2::new(0.0, 2.0))?;
        assert_eq!(h.canvas.get(list)?.scroll_offset().y, -20.0);
        Ok(())
    }

    #[test]
    fn resize_relayouts_on_next_frame() -> Result<()> {
        let mut h = Harness::new(Vec2::new(100.0, 100.0));
        let root = h.root();
        let half = h.canvas.create_node_with(
            "half",
            BoxConstraint {
                size_ratio: Vec2::splat(0.5),
                ..BoxConstraint::default()
            }
            .into(),
            Layout::default(),
        );
        h.canvas.add_child(root, half)?;
        h.frame()?;
        assert_eq!(h.canvas.get(half)?.rect().size(), Vec2::new(50.0, 50.0));
        h.canvas.resize(Vec2::new(300.0, 200.0));
        assert!(h.canvas.is_layout_dirty());
        h.frame()?;
        assert_eq!(h.canvas.get(half)?.rect().size(), Vec2::new(150.0, 100.0));
        Ok(())
    }
}
