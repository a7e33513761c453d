//! Tree structure edits and queries.

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use trellis::{
        Canvas, NodeId,
        component::Hooks,
        error::{Error, Result},
        geom::Vec2,
    };

    /// A canvas with `a` and `b` under the root and `a1`, `a2` under `a`.
    fn tree() -> Result<(Canvas, [NodeId; 4])> {
        let mut canvas = Canvas::new(Vec2::new(100.0, 100.0));
        let root = canvas.root();
        let a = canvas.create_node("a");
        let b = canvas.create_node("b");
        let a1 = canvas.create_node("a1");
        let a2 = canvas.create_node("a2");
        canvas.add_child(root, a)?;
        canvas.add_child(root, b)?;
        canvas.add_child(a, a1)?;
        canvas.add_child(a, a2)?;
        Ok((canvas, [a, b, a1, a2]))
    }

    #[test]
    fn reparent_moves_subtree() -> Result<()> {
        let (mut canvas, [a, b, a1, a2]) = tree()?;
        assert_eq!(
            canvas.add_child(b, a),
            Err(Error::AlreadyAttached(a))
        );
        canvas.detach(a)?;
        canvas.add_child_at(b, a, 0)?;
        assert_eq!(canvas.get(a)?.parent(), Some(b));
        assert_eq!(canvas.ancestors(a2).collect::<Vec<_>>(), vec![a, b, canvas.root()]);
        assert!(canvas.is_ancestor(b, a1));
        assert_eq!(canvas.subtree(canvas.root()).len(), 5);
        Ok(())
    }

    #[test]
    fn cycles_are_rejected() -> Result<()> {
        let (mut canvas, [a, _, a1, _]) = tree()?;
        canvas.detach(a)?;
        assert_eq!(
            canvas.add_child(a1, a),
            Err(Error::WouldCreateCycle { parent: a1, child: a })
        );
        assert_eq!(canvas.get(a)?.parent(), None);
        assert_eq!(canvas.get(a1)?.parent(), Some(a));
        Ok(())
    }

    #[test]
    fn index_queries() -> Result<()> {
        let (mut canvas, [a, b, a1, a2]) = tree()?;
        assert_eq!(canvas.index_of_child(a, a2)?, 1);
        assert_eq!(canvas.child_at(a, 0)?, a1);
        assert_eq!(
            canvas.child_at(a, 2),
            Err(Error::ChildIndexOutOfRange { parent: a, index: 2, len: 2 })
        );
        assert_eq!(
            canvas.index_of_child(b, a1),
            Err(Error::NotAChild { parent: b, child: a1 })
        );
        assert!(canvas.contains_child(a, a1));
        assert!(!canvas.contains_child(b, a1));

        canvas.remove_child(a, a1)?;
        canvas.add_child_at(a, a1, 1)?;
        assert_eq!(canvas.get(a)?.children(), &[a2, a1]);
        Ok(())
    }

    #[test]
    fn names_search_descendants_only() -> Result<()> {
        let (mut canvas, [a, b, a1, _]) = tree()?;
        let deep = canvas.create_node("target");
        canvas.add_child(a1, deep)?;
        let shallow = canvas.create_node("target");
        canvas.add_child(b, shallow)?;
        let root = canvas.root();
        assert_eq!(canvas.find_by_name(root, "target"), Some(deep));
        assert_eq!(canvas.find_by_name(b, "target"), Some(shallow));
        assert_eq!(canvas.find_by_name(a, "a"), None);
        assert_eq!(canvas.child_by_name(a, "target"), None);
        assert_eq!(canvas.child_by_name(a1, "target"), Some(deep));
        Ok(())
    }

    #[test]
    fn removed_ids_go_stale() -> Result<()> {
        let (mut canvas, [a, b, a1, _]) = tree()?;
        canvas.remove_subtree(a)?;
        assert_eq!(canvas.node_count(), 2);
        assert!(!canvas.contains(a1));
        assert_eq!(canvas.get(a1).err(), Some(Error::NodeNotFound(a1)));
        assert_eq!(canvas.add_child(b, a), Err(Error::NodeNotFound(a)));
        assert_eq!(canvas.get(canvas.root())?.children(), &[b]);
        let fresh = canvas.create_node("fresh");
        assert_ne!(fresh, a);
        assert_ne!(fresh, a1);
        Ok(())
    }

    #[test]
    fn root_is_fixed() -> Result<()> {
        let (mut canvas, [a, ..]) = tree()?;
        let root = canvas.root();
        assert_eq!(canvas.remove_subtree(root), Err(Error::CannotRemoveRoot));
        assert_eq!(canvas.detach(root), Err(Error::CannotRemoveRoot));
        assert_eq!(canvas.add_child(a, root), Err(Error::CannotRemoveRoot));
        assert_eq!(canvas.add_child(a, a), Err(Error::AttachToSelf(a)));
        Ok(())
    }

    #[test]
    fn activation_hooks_follow_attachment() -> Result<()> {
        let (mut canvas, [a, b, a1, _]) = tree()?;
        let log = Rc::new(RefCell::new(Vec::new()));
        let on = log.clone();
        let off = log.clone();
        canvas.add_component(
            a1,
            Hooks::new()
                .with_activated(move |_| {
                    on.borrow_mut().push("on");
                    Ok(())
                })
                .with_deactivated(move |_| {
                    off.borrow_mut().push("off");
                    Ok(())
                }),
        )?;
        assert_eq!(*log.borrow(), vec!["on"]);

        canvas.detach(a)?;
        canvas.set_active(b, false)?;
        canvas.add_child(b, a)?;
        assert!(!canvas.get(a1)?.is_active_in_hierarchy());
        assert!(canvas.get(a1)?.active_self());
        assert_eq!(*log.borrow(), vec!["on", "off"]);

        canvas.set_active(b, true)?;
        assert_eq!(*log.borrow(), vec!["on", "off", "on"]);
        canvas.remove_subtree(b)?;
        assert_eq!(*log.borrow(), vec!["on", "off", "on", "off"]);
        Ok(())
    }
}
