//! Property-based tests for route parsing

use proptest::prelude::*;
use sage3::shared::{EntityKind, ParentField, Route};

fn any_kind() -> impl Strategy<Value = EntityKind> {
    prop::sample::select(EntityKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn test_item_id_is_last_segment(kind in any_kind(), id in "[A-Za-z0-9-]{1,36}") {
        let route = format!("/api/{}/{}", kind.collection(), id);
        prop_assert_eq!(Route::parse(&route).unwrap(), Route::Item(kind, id));
    }

    #[test]
    fn test_query_string_is_ignored(kind in any_kind(), query in "[a-z]{1,8}=[a-z0-9]{0,8}") {
        let route = format!("/api/{}?{}", kind.collection(), query);
        prop_assert_eq!(Route::parse(&route).unwrap(), Route::Collection(kind));
    }

    #[test]
    fn test_unknown_collections_never_parse(name in "[a-z]{1,12}") {
        prop_assume!(EntityKind::from_collection(&name).is_none());
        let bare = format!("/api/{}", name);
        let nested = format!("/api/{}/x", name);
        prop_assert!(Route::parse(&bare).is_err());
        prop_assert!(Route::parse(&nested).is_err());
    }

    #[test]
    fn test_parent_routes(parent_id in "[a-z0-9]{1,16}") {
        let boards = Route::parse(&format!("/api/boards/room/{}", parent_id)).unwrap();
        prop_assert_eq!(boards, Route::ByParent {
            kind: EntityKind::Board,
            parent: ParentField::Room,
            parent_id: parent_id.clone(),
        });

        // Only boards link to rooms
        let apps = format!("/api/apps/room/{}", parent_id);
        prop_assert!(Route::parse(&apps).is_err());
    }
}
