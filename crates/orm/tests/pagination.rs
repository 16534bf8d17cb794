mod common;

use common::{ids, seeded_store, Item};
use rowset_orm::backends::StatementKind;
use rowset_orm::{paginate, paginate_request, Filter, OrderBy, OrmError, PageRequest};

#[tokio::test]
async fn test_second_page_of_twenty_five() {
    let store = seeded_store(25);
    let mut session = store.session();

    let page = paginate::<Item, _>(&mut session, 10, 10, vec![OrderBy::asc("id")], vec![])
        .await
        .unwrap();

    assert_eq!(page.total_count, 25);
    assert_eq!(page.count, 10);
    assert_eq!(page.limit, 10);
    assert_eq!(page.offset, 10);
    assert_eq!(ids(&page.results), (11..=20).collect::<Vec<_>>());
    assert!(page.has_more());
    assert_eq!(page.total_pages(), 3);
}

#[tokio::test]
async fn test_last_partial_page() {
    let store = seeded_store(25);
    let mut session = store.session();

    let page = paginate::<Item, _>(&mut session, 20, 10, vec![OrderBy::asc("id")], vec![])
        .await
        .unwrap();

    assert_eq!(page.count, 5);
    assert_eq!(ids(&page.results), vec![21, 22, 23, 24, 25]);
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_zero_limit_reports_total_only() {
    let store = seeded_store(25);
    let mut session = store.session();

    let page = paginate::<Item, _>(&mut session, 0, 0, vec![], vec![])
        .await
        .unwrap();

    assert_eq!(page.total_count, 25);
    assert_eq!(page.count, 0);
    assert!(page.results.is_empty());

    let kinds: Vec<_> = store.executed().iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![StatementKind::Count]);
}

#[tokio::test]
async fn test_offset_past_end_is_empty() {
    let store = seeded_store(25);
    let mut session = store.session();

    let page = paginate::<Item, _>(&mut session, 25, 10, vec![OrderBy::asc("id")], vec![])
        .await
        .unwrap();
    assert_eq!(page.total_count, 25);
    assert_eq!(page.count, 0);

    let page = paginate::<Item, _>(&mut session, 1000, 10, vec![], vec![])
        .await
        .unwrap();
    assert_eq!(page.total_count, 25);
    assert!(page.results.is_empty());
}

#[tokio::test]
async fn test_negative_arguments_fail_before_any_statement() {
    let store = seeded_store(25);
    let mut session = store.session();

    let err = paginate::<Item, _>(&mut session, -1, 10, vec![], vec![])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OrmError::InvalidArgument {
            argument: "offset",
            value: -1
        }
    );

    let err = paginate::<Item, _>(&mut session, 0, -5, vec![], vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::InvalidArgument { argument: "limit", .. }));

    assert!(store.executed().is_empty());
}

#[tokio::test]
async fn test_filters_apply_to_count_and_page() {
    let store = seeded_store(25);
    let mut session = store.session();

    let page = paginate::<Item, _>(
        &mut session,
        0,
        5,
        vec![OrderBy::desc("id")],
        vec![Filter::eq("status", "active")],
    )
    .await
    .unwrap();

    assert_eq!(page.total_count, 12);
    assert_eq!(ids(&page.results), vec![24, 22, 20, 18, 16]);
    assert!(page.results.iter().all(|item| item.status == "active"));
}

#[tokio::test]
async fn test_count_statement_ignores_window_and_ordering() {
    let store = seeded_store(25);
    let mut session = store.session();

    paginate::<Item, _>(
        &mut session,
        5,
        10,
        vec![OrderBy::asc("name")],
        vec![Filter::eq("status", "active")],
    )
    .await
    .unwrap();

    let executed = store.executed();
    assert_eq!(executed.len(), 2);
    assert_eq!(executed[0].kind, StatementKind::Count);
    assert_eq!(
        executed[0].sql,
        "SELECT COUNT(*) FROM \"items\" WHERE \"status\" = $1"
    );
    assert_eq!(executed[1].kind, StatementKind::Select);
    assert_eq!(
        executed[1].sql,
        "SELECT * FROM \"items\" WHERE \"status\" = $1 ORDER BY \"name\" ASC LIMIT 10 OFFSET 5"
    );
}

#[tokio::test]
async fn test_same_request_same_page() {
    let store = seeded_store(25);
    let mut session = store.session();
    let request = PageRequest::new(3, 7)
        .order_by(OrderBy::asc("name"))
        .filter(Filter::gt("id", 2));

    let first = paginate_request::<Item, _>(&mut session, request.clone())
        .await
        .unwrap();
    let second = paginate_request::<Item, _>(&mut session, request)
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_consecutive_pages_cover_the_ordered_set() {
    let store = seeded_store(25);
    let mut session = store.session();

    let mut seen = Vec::new();
    let mut offset = 0;
    loop {
        let page = paginate::<Item, _>(&mut session, offset, 4, vec![OrderBy::asc("id")], vec![])
            .await
            .unwrap();
        assert_eq!(page.total_count, 25);
        assert!(page.count <= 4);
        if page.results.is_empty() {
            break;
        }
        seen.extend(ids(&page.results));
        offset += 4;
    }

    assert_eq!(seen, (1..=25).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_count_never_decreases_as_limit_grows() {
    let store = seeded_store(25);
    let mut session = store.session();

    let mut previous = 0;
    for limit in 0..=30 {
        let page = paginate::<Item, _>(&mut session, 7, limit, vec![OrderBy::asc("id")], vec![])
            .await
            .unwrap();
        assert!(page.count >= previous, "count shrank at limit {}", limit);
        assert_eq!(page.count, (limit as u64).min(18));
        previous = page.count;
    }
    assert_eq!(previous, 18);
}

#[tokio::test]
async fn test_session_failure_propagates() {
    let store = seeded_store(3);
    let mut session = store.session();
    store.fail_next("server closed the connection");

    let err = paginate::<Item, _>(&mut session, 0, 10, vec![], vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::Connection(_)));
}
