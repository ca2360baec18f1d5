use prefetch::{
    stmt::{Filter, Value},
    Db,
};
use pretty_assertions::assert_eq;
use tests::{create, models::models, names, DbTest};

async fn seed_author(db: &Db, name: &str, books: std::ops::Range<i64>) -> Value {
    let author = create(db, "Author", &[("name", name.into())]).await;

    for i in books {
        create(
            db,
            "Book",
            &[
                ("name", format!("Book {i}").into()),
                ("created", i.into()),
                ("author_id", author.key().clone()),
            ],
        )
        .await;
    }

    author.key().clone()
}

#[tokio::test]
async fn books() {
    let mut test = DbTest::new();
    let db = test.setup_db(models());

    let author = seed_author(&db, "John Doe", 0..3).await;

    let authors = db
        .select("Author")
        .unwrap()
        .with_prefetch(["books"])
        .unwrap()
        .filter(Filter::eq("id", author.clone()))
        .all()
        .await
        .unwrap();

    assert_eq!(authors.len(), 1);
    assert!(authors[0].is_prefetched("books"));
    assert_eq!(
        names(authors[0].prefetched("books")),
        ["Book 0", "Book 1", "Book 2"]
    );

    let authors = db
        .select("Author")
        .unwrap()
        .filter(Filter::eq("id", author))
        .all()
        .await
        .unwrap();

    assert_eq!(authors.len(), 1);
    assert!(!authors[0].is_prefetched("books"));
    assert_eq!(authors[0].prefetched("books"), None);
}

#[tokio::test]
async fn books_get() {
    let mut test = DbTest::new();
    let db = test.setup_db(models());

    let author = seed_author(&db, "John Doe", 0..3).await;

    let select = db
        .select("Author")
        .unwrap()
        .with_prefetch(["books"])
        .unwrap();

    let found = select
        .filter(Filter::eq("id", author.clone()))
        .get()
        .await
        .unwrap();
    assert_eq!(names(found.prefetched("books")).len(), 3);

    let found = db
        .select("Author")
        .unwrap()
        .filter(Filter::eq("name", "John Doe"))
        .get()
        .await
        .unwrap();
    assert!(!found.is_prefetched("books"));

    let err = select
        .filter(Filter::eq("name", "Nobody"))
        .get()
        .await
        .unwrap_err();
    assert!(err.is_record_not_found(), "{err}");

    seed_author(&db, "John Doe", 0..0).await;
    let err = select
        .filter(Filter::eq("name", "John Doe"))
        .get()
        .await
        .unwrap_err();
    assert!(err.is_too_many_records(), "{err}");
}

#[tokio::test]
async fn books_first() {
    let mut test = DbTest::new();
    let db = test.setup_db(models());

    seed_author(&db, "First", 0..2).await;
    seed_author(&db, "Second", 2..5).await;

    let select = db
        .select("Author")
        .unwrap()
        .with_prefetch(["books"])
        .unwrap();

    let first = select.first().await.unwrap().unwrap();
    assert_eq!(first.get("name"), Some(&Value::from("First")));
    assert_eq!(names(first.prefetched("books")), ["Book 0", "Book 1"]);

    let none = select
        .filter(Filter::eq("name", "Nobody"))
        .first()
        .await
        .unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn author_without_books_gets_default() {
    let mut test = DbTest::new();
    let db = test.setup_db(models());

    let prolific = seed_author(&db, "Prolific", 0..4).await;
    let idle = seed_author(&db, "Idle", 0..0).await;

    let authors = db
        .select("Author")
        .unwrap()
        .with_prefetch(["books"])
        .unwrap()
        .all()
        .await
        .unwrap();

    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0].key(), &prolific);
    assert_eq!(names(authors[0].prefetched("books")).len(), 4);

    // Decorated with the "no related items" default
    assert_eq!(authors[1].key(), &idle);
    assert_eq!(authors[1].prefetched("books"), Some(&Value::List(vec![])));
}

#[tokio::test]
async fn latest_book() {
    let mut test = DbTest::new();
    let db = test.setup_db(models());

    let author1 = seed_author(&db, "Johnny", 3..6).await;
    let author2 = seed_author(&db, "Johnny", 0..0).await;

    let select = db
        .select("Author")
        .unwrap()
        .with_prefetch(["latest_book"])
        .unwrap();

    let found = select
        .filter(Filter::eq("id", author1.clone()))
        .get()
        .await
        .unwrap();
    let latest = found
        .prefetched("latest_book")
        .unwrap()
        .as_record()
        .unwrap();
    assert_eq!(latest.get("name"), Some(&Value::from("Book 5")));

    let found = select
        .filter(Filter::eq("id", author2.clone()))
        .get()
        .await
        .unwrap();
    assert_eq!(found.prefetched("latest_book"), Some(&Value::Null));

    for author in [author1, author2] {
        let found = db
            .select("Author")
            .unwrap()
            .filter(Filter::eq("id", author))
            .get()
            .await
            .unwrap();
        assert!(!found.is_prefetched("latest_book"));
    }
}

#[tokio::test]
async fn one_bulk_query_per_prefetch() {
    let mut test = DbTest::new();
    let db = test.setup_db(models());

    for i in 0..10 {
        seed_author(&db, &format!("Author {i}"), 0..i).await;
    }

    let mut log = test.log();
    log.clear();

    let authors = db
        .select("Author")
        .unwrap()
        .with_prefetch(["books", "latest_book"])
        .unwrap()
        .all()
        .await
        .unwrap();

    assert_eq!(authors.len(), 10);
    // 1 base query + 1 per prefetch, independent of the number of rows
    assert_eq!(log.queries(), 3);
    assert_eq!(log.inserts(), 0);

    let author = db.schema().model_by_name("Author").unwrap().id;
    let book = db.schema().model_by_name("Book").unwrap().id;
    assert_eq!(log.queries_of(author), 1);
    assert_eq!(log.queries_of(book), 2);

    for (i, author) in authors.iter().enumerate() {
        assert_eq!(names(author.prefetched("books")).len(), i);
        assert_eq!(author.prefetched("latest_book").unwrap().is_null(), i == 0);
    }
}

#[tokio::test]
async fn bulk_query_receives_every_key_once() {
    let mut test = DbTest::new();
    let db = test.setup_db(models());

    let a = seed_author(&db, "A", 0..1).await;
    let b = seed_author(&db, "B", 0..0).await;

    let mut log = test.log();
    log.clear();

    db.select("Author")
        .unwrap()
        .with_prefetch(["books"])
        .unwrap()
        .all()
        .await
        .unwrap();

    let queries = log.query_ops();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[1].filter, Filter::in_list("author_id", [a, b]));
}
