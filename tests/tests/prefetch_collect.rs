use prefetch::{
    schema::{Field, Model},
    stmt::{Filter, Query, Value},
    Db, Prefetcher, Registry,
};
use pretty_assertions::assert_eq;
use tests::{create, names, DbTest};

/// Books with a `siblings` prefetch keyed by author: every book gets the
/// books sharing its author.
fn catalogue(collect: bool) -> prefetch::db::Builder {
    let siblings = Prefetcher::builder()
        .mapper(|book| Ok(book.get("author_id").cloned().unwrap_or_default()))
        .filter(|ids| Ok(Query::filter("Book", Filter::in_list("author_id", ids.to_vec()))))
        .reverse_mapper(|book| Ok(vec![book.get("author_id").cloned().unwrap_or_default()]))
        .decorator(|book, siblings| {
            book.set_prefetched("siblings", siblings.unwrap_or_default().to_vec());
            Ok(())
        })
        .collect(collect)
        .build()
        .unwrap();

    let mut builder = Db::builder();
    builder
        .register(Model::new("Author").field(Field::key("id")))
        .register(
            Model::new("Book")
                .field(Field::key("id"))
                .field(Field::string("name"))
                .field(Field::i64("author_id"))
                .field(Field::belongs_to("author", "Author", "author_id")),
        )
        .prefetch("Book", Registry::new().define("siblings", siblings));
    builder
}

async fn seed(db: &Db) {
    let author = create(db, "Author", &[]).await;
    for name in ["First", "Second"] {
        create(
            db,
            "Book",
            &[("name", name.into()), ("author_id", author.key().clone())],
        )
        .await;
    }
}

#[tokio::test]
async fn collect_decorates_every_row_sharing_a_key() {
    let mut test = DbTest::new();
    let db = test.setup_db(catalogue(true));
    seed(&db).await;

    let books = db
        .select("Book")
        .unwrap()
        .with_prefetch(["siblings"])
        .unwrap()
        .all()
        .await
        .unwrap();

    for book in &books {
        assert_eq!(names(book.prefetched("siblings")), ["First", "Second"]);
    }
}

#[tokio::test]
async fn without_collect_the_last_row_wins() {
    let mut test = DbTest::new();
    let db = test.setup_db(catalogue(false));
    seed(&db).await;

    let books = db
        .select("Book")
        .unwrap()
        .with_prefetch(["siblings"])
        .unwrap()
        .all()
        .await
        .unwrap();

    // Both rows are primed, only the last one with a given key is stitched
    assert_eq!(books[0].prefetched("siblings"), Some(&Value::List(vec![])));
    assert_eq!(names(books[1].prefetched("siblings")), ["First", "Second"]);
}

#[tokio::test]
async fn with_prefetch_copies() {
    let mut test = DbTest::new();
    let db = test.setup_db(catalogue(true));
    seed(&db).await;

    let base = db.select("Book").unwrap();
    let with = base.with_prefetch(["siblings"]).unwrap();
    let filtered = with.filter(Filter::eq("name", "First"));

    assert_eq!(base.prefetches().count(), 0);
    assert_eq!(with.prefetches().collect::<Vec<_>>(), ["siblings"]);
    assert!(with.to_query().filter.is_all());

    let books = base.all().await.unwrap();
    assert!(books.iter().all(|book| !book.is_prefetched("siblings")));

    let books = filtered.all().await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(names(books[0].prefetched("siblings")), ["First", "Second"]);
}
