//! Which clients the overlay draws, and in which color.

use crate::traits::{Client, Manager};

/// Name of the layout that shows a single maximized client.
pub const FULLSCREEN_LAYOUT: &str = "fullscreen";

/// Color role of a drawn client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Master,
    Slave,
}

/// Pick the clients to draw for `layout`, in manager order.
///
/// Normally every managed client is drawn.  When any of them is fullscreen,
/// or the layout itself is [`FULLSCREEN_LAYOUT`], only the single visible
/// client is drawn.  Under the fullscreen layout every drawn client is a
/// master.
pub fn select_clients<M: Manager>(manager: &M, layout: &str) -> Vec<(M::Client, Role)> {
    let fullscreen_layout = layout == FULLSCREEN_LAYOUT;

    // Detection looks at the full set; drawing uses the re-fetched subset.
    let all = manager.clients();
    let clients = if fullscreen_layout || all.iter().any(|c| c.is_fullscreen()) {
        manager.visible(1)
    } else {
        all
    };

    clients
        .into_iter()
        .map(|c| {
            let role = if fullscreen_layout || manager.is_master(&c) {
                Role::Master
            } else {
                Role::Slave
            };
            (c, role)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::traits::mock::{MockClient, MockManager};

    fn rect() -> Rect {
        Rect::new(0, 0, 100, 100)
    }

    fn ids(selected: &[(MockClient, Role)]) -> Vec<(u32, Role)> {
        selected.iter().map(|(c, r)| (c.id, *r)).collect()
    }

    #[test]
    fn all_clients_with_roles() {
        let mg = MockManager::new(vec![
            MockClient::new(1, rect()).master(),
            MockClient::new(2, rect()),
            MockClient::new(3, rect()).hidden(),
        ]);
        let selected = select_clients(&mg, "vertical-left");
        assert_eq!(
            ids(&selected),
            vec![(1, Role::Master), (2, Role::Slave), (3, Role::Slave)]
        );
        assert!(mg.visible_queries.borrow().is_empty());
    }

    #[test]
    fn fullscreen_client_restricts_to_one_visible() {
        let mg = MockManager::new(vec![
            MockClient::new(1, rect()).hidden().fullscreen(),
            MockClient::new(2, rect()),
            MockClient::new(3, rect()).master(),
        ]);
        let selected = select_clients(&mg, "horizontal-top");
        assert_eq!(ids(&selected), vec![(2, Role::Slave)]);
        assert_eq!(*mg.visible_queries.borrow(), vec![1]);
    }

    #[test]
    fn fullscreen_layout_draws_visible_as_master() {
        let mg = MockManager::new(vec![
            MockClient::new(1, rect()).hidden(),
            MockClient::new(2, rect()),
            MockClient::new(3, rect()),
        ]);
        let selected = select_clients(&mg, FULLSCREEN_LAYOUT);
        assert_eq!(ids(&selected), vec![(2, Role::Master)]);
    }

    #[test]
    fn empty_manager_selects_nothing() {
        let mg = MockManager::new(Vec::new());
        assert!(select_clients(&mg, FULLSCREEN_LAYOUT).is_empty());
        assert!(select_clients(&mg, "vertical-right").is_empty());
    }
}
