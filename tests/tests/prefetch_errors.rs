use prefetch::{
    err,
    schema::{app::ModelId, Field, Model},
    stmt::{Filter, Query, Record, Value},
    Db, Prefetch, Prefetcher, Registry, Result,
};
use pretty_assertions::assert_eq;
use tests::{create, models::models, names, DbTest};

#[test]
fn definition_requires_every_function() {
    let err = Prefetcher::builder().build().unwrap_err();
    assert!(err.is_invalid_definition(), "{err}");

    let err = Prefetcher::builder()
        .filter(|_| Ok(Query::all("Book")))
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid prefetch definition: you must define a reverse_mapper function"
    );

    let err = Prefetcher::builder()
        .filter(|_| Ok(Query::all("Book")))
        .reverse_mapper(|_| Ok(vec![]))
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid prefetch definition: you must define a decorator function"
    );
}

#[tokio::test]
async fn decorator_error_propagates_unchanged() {
    let mut test = DbTest::new();
    let db = test.setup_db(models());

    create(&db, "Author", &[("name", "John Doe".into())]).await;

    let err = db
        .select("Author")
        .unwrap()
        .with_prefetch(["silly"])
        .unwrap()
        .all()
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "silly decorator");
}

#[tokio::test]
async fn filter_runs_even_without_keys() {
    let mut test = DbTest::new();
    let db = test.setup_db(models());

    let select = db
        .select("Author")
        .unwrap()
        .with_prefetch(["silly"])
        .unwrap();

    let err = select.all().await.unwrap_err();
    assert_eq!(err.to_string(), "silly filter");
}

/// Maps every book to its author, but fails on the book named `Broken`.
struct FailingReverseMapper;

impl Prefetch for FailingReverseMapper {
    fn filter(&self, ids: &[Value]) -> Result<Query> {
        Ok(Query::filter("Book", Filter::in_list("author_id", ids.to_vec())))
    }

    fn reverse_mapper(&self, book: &Record) -> Result<Vec<Value>> {
        match book.get("name").and_then(Value::as_str) {
            Some("Broken") => Err(err!("cannot map book {}", book.key())),
            _ => Ok(vec![book.get("author_id").cloned().unwrap_or_default()]),
        }
    }

    fn decorator(&self, author: &mut Record, books: Option<&[Record]>) -> Result<()> {
        author.set_prefetched("books", books.unwrap_or_default().to_vec());
        Ok(())
    }
}

fn catalogue(registry: Registry) -> prefetch::db::Builder {
    let mut builder = Db::builder();
    builder
        .register(
            Model::new("Author")
                .field(Field::key("id"))
                .field(Field::string("name")),
        )
        .register(
            Model::new("Book")
                .field(Field::key("id"))
                .field(Field::string("name"))
                .field(Field::i64("author_id").nullable())
                .field(Field::belongs_to("author", "Author", "author_id")),
        )
        .prefetch("Author", registry);
    builder
}

#[tokio::test]
async fn reverse_mapper_error_propagates() {
    let mut test = DbTest::new();
    let db = test.setup_db(catalogue(
        Registry::new().define("books", FailingReverseMapper),
    ));

    let author = create(&db, "Author", &[("name", "A".into())]).await;
    for name in ["Fine", "Broken"] {
        create(
            &db,
            "Book",
            &[("name", name.into()), ("author_id", author.key().clone())],
        )
        .await;
    }

    let err = db
        .select("Author")
        .unwrap()
        .with_prefetch(["books"])
        .unwrap()
        .all()
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "cannot map book 2");
}

#[tokio::test]
async fn null_reverse_keys_are_dropped() {
    // Filter on everything so the orphan comes back from the bulk query
    let everything = Prefetcher::builder()
        .filter(|_| Ok(Query::all("Book")))
        .reverse_mapper(|book| Ok(vec![book.get("author_id").cloned().unwrap_or_default()]))
        .decorator(|author, books| {
            author.set_prefetched("books", books.unwrap_or_default().to_vec());
            Ok(())
        })
        .build()
        .unwrap();

    let mut test = DbTest::new();
    let db = test.setup_db(catalogue(Registry::new().define("books", everything)));

    let author = create(&db, "Author", &[("name", "A".into())]).await;
    create(
        &db,
        "Book",
        &[("name", "Owned".into()), ("author_id", author.key().clone())],
    )
    .await;
    create(&db, "Book", &[("name", "Orphan".into())]).await;

    let authors = db
        .select("Author")
        .unwrap()
        .with_prefetch(["books"])
        .unwrap()
        .all()
        .await
        .unwrap();

    assert_eq!(names(authors[0].prefetched("books")), ["Owned"]);
}

#[tokio::test]
async fn empty_reverse_keys_are_dropped() {
    // Authors are keyed by name; each book maps back to the author named
    // like the book.
    let namesakes = Prefetcher::builder()
        .mapper(|author| Ok(author.get("name").cloned().unwrap_or_default()))
        .filter(|_| Ok(Query::all("Book")))
        .reverse_mapper(|book| Ok(vec![book.get("name").cloned().unwrap_or_default()]))
        .decorator(|author, books| {
            author.set_prefetched("books", books.unwrap_or_default().to_vec());
            Ok(())
        })
        .build()
        .unwrap();

    let mut test = DbTest::new();
    let db = test.setup_db(catalogue(Registry::new().define("books", namesakes)));

    create(&db, "Author", &[("name", "Ann".into())]).await;
    create(&db, "Author", &[("name", "".into())]).await;
    create(&db, "Book", &[("name", "Ann".into())]).await;
    create(&db, "Book", &[("name", "".into())]).await;

    let authors = db
        .select("Author")
        .unwrap()
        .with_prefetch(["books"])
        .unwrap()
        .all()
        .await
        .unwrap();

    assert_eq!(names(authors[0].prefetched("books")), ["Ann"]);
    assert_eq!(authors[1].prefetched("books"), Some(&Value::List(vec![])));
}

#[tokio::test]
async fn filter_on_unknown_model_id_fails() {
    let stray = Prefetcher::builder()
        .filter(|_| Ok(Query::all(ModelId(99))))
        .reverse_mapper(|_| Ok(vec![]))
        .decorator(|_, _| Ok(()))
        .build()
        .unwrap();

    let mut test = DbTest::new();
    let db = test.setup_db(catalogue(Registry::new().define("books", stray)));

    create(&db, "Author", &[("name", "A".into())]).await;

    let err = db
        .select("Author")
        .unwrap()
        .with_prefetch(["books"])
        .unwrap()
        .all()
        .await
        .unwrap_err();

    assert!(err.is_invalid_schema(), "{err}");
    assert_eq!(err.to_string(), "invalid schema: unknown model id ModelId(99)");
    assert_eq!(test.log().queries(), 1);
}
