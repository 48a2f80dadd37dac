use jsonapi_client::{Client, ClientConfig, IncludePolicy, Query, ResourceId, TypedCollection};
use jsonapi_core::mock::MockTransport;
use jsonapi_sample::model::{AuthorCreate, AuthorRef, BookCreate, BookUpdate};
use jsonapi_sample::{Library, LibraryError};
use serde_json::json;

fn library(mock: &MockTransport) -> Library<MockTransport> {
    Library::new(Client::new(mock.clone(), ClientConfig::default()))
}

fn author_doc(id: &str, name: &str) -> serde_json::Value {
    json!({"data": {"type": "authors", "id": id, "attributes": {"name": name}}})
}

/// Publishing checks the author first, then sends the book.
#[tokio::test]
async fn test_publish_for_known_author() {
    let mock = MockTransport::new();
    mock.expect_get("authors/9")
        .return_document(author_doc("9", "Frank Herbert"));
    mock.expect_post("books").return_json(
        201,
        json!({"data": {
            "type": "books", "id": "100",
            "attributes": {"title": "Dune", "published": 1965},
            "relationships": {"author": {"data": {"type": "authors", "id": "9"}}}
        }}),
    );

    let book = library(&mock)
        .publish(BookCreate::new("Dune", "9").published(1965))
        .await
        .expect("Failed to publish");

    assert_eq!(book.id, "100");
    assert_eq!(book.published, Some(1965));
    assert_eq!(book.author, Some(AuthorRef::new("9")));

    // The author went out as a reference, the rest as attributes.
    let sent = mock.requests().pop().unwrap();
    let body = serde_json::to_value(sent.body.unwrap()).unwrap();
    assert_eq!(
        body,
        json!({"data": {
            "type": "books",
            "attributes": {"title": "Dune", "published": 1965},
            "relationships": {"author": {"data": {"type": "authors", "id": "9"}}}
        }})
    );
    mock.verify();
}

#[tokio::test]
async fn test_publish_for_unknown_author_sends_nothing() {
    let mock = MockTransport::new();
    mock.expect_get("authors/404").return_status(404);

    let result = library(&mock)
        .publish(BookCreate::new("Ghost", "404"))
        .await;

    assert_eq!(result, Err(LibraryError::UnknownAuthor("404".into())));
    assert_eq!(mock.requests().len(), 1, "No POST after a failed check");
    mock.verify();
}

#[tokio::test]
async fn test_catalogue_walks_every_page() {
    let mock = MockTransport::new();
    mock.expect_get("books").return_document(json!({
        "data": [
            {"type": "books", "id": "1", "attributes": {"title": "Dune"},
             "relationships": {"author": {"data": {"type": "authors", "id": "9"}}}},
            {"type": "books", "id": "2", "attributes": {"title": "Emma"}}
        ],
        "included": [{"type": "authors", "id": "9", "attributes": {"name": "Frank Herbert"}}],
        "links": {"next": "/books?page%5Bnumber%5D=2"}
    }));
    mock.expect_get("/books?page%5Bnumber%5D=2").return_document(json!({
        "data": [{"type": "books", "id": "3", "attributes": {"title": "Ulysses"}}]
    }));

    let books = library(&mock).catalogue().await.unwrap();

    let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Dune", "Emma", "Ulysses"]);
    assert_eq!(
        books[0].author.as_ref().and_then(|a| a.name.as_deref()),
        Some("Frank Herbert")
    );
    mock.verify();
}

#[tokio::test]
async fn test_bibliography_queries_books_by_author() {
    let mock = MockTransport::new();
    mock.expect_get("authors/9")
        .return_document(author_doc("9", "Frank Herbert"));
    mock.expect_get("books?include=author&filter%5Bauthor%5D=9&sort=-published")
        .return_document(json!({
            "data": [
                {"type": "books", "id": "2", "attributes": {"title": "Dune Messiah", "published": 1969},
                 "relationships": {"author": {"data": {"type": "authors", "id": "9"}}}},
                {"type": "books", "id": "1", "attributes": {"title": "Dune", "published": 1965},
                 "relationships": {"author": {"data": {"type": "authors", "id": "9"}}}}
            ],
            "included": [{"type": "authors", "id": "9", "attributes": {"name": "Frank Herbert"}}]
        }));

    let (author, books) = library(&mock).bibliography("9").await.unwrap();
    assert_eq!(author.name, "Frank Herbert");
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].published, Some(1969));
    mock.verify();
}

#[tokio::test]
async fn test_bibliography_of_missing_author() {
    let mock = MockTransport::new();
    mock.expect_get("authors/1").return_status(404);

    let err = library(&mock).bibliography("1").await.unwrap_err();
    assert!(matches!(err, LibraryError::NotFound(_)));
    mock.verify();
}

#[tokio::test]
async fn test_author_with_books_side_loaded() {
    let mock = MockTransport::new();
    mock.expect_get("authors/9?include=books").return_document(json!({
        "data": {"type": "authors", "id": "9", "attributes": {"name": "Frank Herbert"},
                 "relationships": {"books": {"data": [
                     {"type": "books", "id": "1"}, {"type": "books", "id": "2"}
                 ]}}},
        "included": [{"type": "books", "id": "1", "attributes": {"title": "Dune"}}]
    }));

    let author = library(&mock)
        .authors
        .with_books("9")
        .await
        .unwrap()
        .expect("Author not found");
    let books = author.books.expect("Relationship missing");
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].title.as_deref(), Some("Dune"));
    // Not side-loaded: only the identifier survives.
    assert_eq!(books[1].title, None);
    mock.verify();
}

#[tokio::test]
async fn test_strict_policy_rejects_missing_includes() {
    let mock = MockTransport::new();
    mock.expect_get("books/1").return_document(json!({
        "data": {"type": "books", "id": "1", "attributes": {"title": "Dune"},
                 "relationships": {"author": {"data": {"type": "authors", "id": "9"}}}}
    }));

    let strict = Library::new(Client::new(
        mock.clone(),
        ClientConfig::default().include_policy(IncludePolicy::Strict),
    ));
    let err = strict.books.get(ResourceId::from("1")).await.unwrap_err();
    assert!(matches!(err, LibraryError::CommunicationError(msg) if msg.contains("author")));
    mock.verify();
}

#[tokio::test]
async fn test_update_retire_and_create_author() {
    let mock = MockTransport::new();
    mock.expect_patch("books/1").return_status(204);
    mock.expect_delete("books/1").return_status(204);
    mock.expect_post("authors").return_json(
        201,
        json!({"data": {"type": "authors", "id": "12", "attributes": {"name": "Mary Shelley", "born": 1797}}}),
    );

    let library = library(&mock);
    let updated = library
        .books
        .update_book(BookUpdate::new("1").title("Dune (50th anniversary)"))
        .await
        .unwrap();
    assert_eq!(updated, None);

    library.retire("1").await.unwrap();

    let author = library
        .authors
        .create_author(AuthorCreate {
            name: "Mary Shelley".into(),
            born: Some(1797),
        })
        .await
        .unwrap();
    assert_eq!(author.id, "12");
    assert_eq!(author.born, Some(1797));
    assert_eq!(author.books, None);

    let patch = serde_json::to_value(mock.requests()[0].body.clone().unwrap()).unwrap();
    assert_eq!(
        patch,
        json!({"data": {"type": "books", "id": "1", "attributes": {"title": "Dune (50th anniversary)"}}})
    );
    mock.verify();
}

#[tokio::test]
async fn test_single_page_exposes_next_link() {
    let mock = MockTransport::new();
    mock.expect_get("books?page%5Bsize%5D=1").return_document(json!({
        "data": [{"type": "books", "id": "1", "attributes": {"title": "Dune"}}],
        "links": {"next": "/books?page%5Bnumber%5D=2&page%5Bsize%5D=1"}
    }));

    let (books, next) = library(&mock)
        .books
        .page(&Query::new().page("size", 1))
        .await
        .unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(next.as_deref(), Some("/books?page%5Bnumber%5D=2&page%5Bsize%5D=1"));
    mock.verify();
}
