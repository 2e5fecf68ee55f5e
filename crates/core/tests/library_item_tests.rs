//! Integration tests for library items through their capability traits

use mediahub_core::{
    BaseItem, Book, HasTags, LibraryItem, MediaType, SortNameRules, Validator,
};
use std::path::Path;

fn meta_locations<'a>(items: &[&'a dyn LibraryItem]) -> Vec<Option<&'a Path>> {
    items.iter().map(|item| item.meta_location()).collect()
}

#[test]
fn test_book_and_plain_item_differ_in_meta_location() {
    let book = Book::new("Foo", "/library/books/Foo/Foo.epub");
    let folder = BaseItem::new("Books", "/library/books");

    let locations = meta_locations(&[&book, &folder]);
    assert_eq!(locations[0], Some(Path::new("/library/books/Foo")));
    assert_eq!(locations[1], Some(Path::new("/library/books")));
}

#[test]
fn test_media_type_through_trait_object() {
    let book = Book::new("Foo", "/library/books/Foo/Foo.epub");
    let folder = BaseItem::new("Books", "/library/books");

    let items: [&dyn LibraryItem; 2] = [&book, &folder];
    let types: Vec<_> = items.iter().map(|item| item.media_type()).collect();
    assert_eq!(types, vec![Some(MediaType::Book), None]);
}

#[test]
fn test_meta_location_follows_path_changes() {
    let mut book = Book::new("Foo", "/library/books/Foo/Foo.epub");
    book.base_mut().path = "/library/archive/Foo.epub".into();
    assert_eq!(book.meta_location(), Some(Path::new("/library/archive")));

    book.base_mut().path = "".into();
    assert_eq!(book.meta_location(), None);
}

#[test]
fn test_resolve_args_follow_mixed_folder_flag() {
    let mut book = Book::new("Foo", "/library/books/Foo/Foo.epub");
    assert!(book.use_parent_path_to_create_resolve_args());

    book.base_mut().is_in_mixed_folder = true;
    assert!(!book.use_parent_path_to_create_resolve_args());

    let folder = BaseItem::new("Books", "/library/books");
    assert!(!folder.use_parent_path_to_create_resolve_args());
}

#[test]
fn test_tags_are_shared_state() {
    let mut book = Book::new("Dune", "/library/books/Dune/Dune.epub");
    assert!(book.tags().is_empty());

    book.tags_mut().push("Sci-Fi".to_string());
    assert!(book.add_tag("classic"));
    assert!(!book.add_tag("SCI-FI"));

    assert_eq!(book.tags(), &["Sci-Fi".to_string(), "classic".to_string()]);
    assert!(book.has_tag("sci-fi"));
}

#[test]
fn test_sort_names_for_a_shelf() {
    let rules = SortNameRules::default();
    let mut shelf = vec![
        Book::new("The Two Towers", "/b/1.epub"),
        Book::new("An Instance of the Fingerpost", "/b/2.epub"),
        Book::new("A Game of Thrones", "/b/3.epub"),
    ];
    shelf[0].base_mut().forced_sort_name = Some("lord of the rings 2".to_string());

    shelf.sort_by_key(|book| book.sort_name(&rules));
    let names: Vec<&str> = shelf.iter().map(|b| b.base().name.as_str()).collect();

    assert_eq!(
        names,
        vec![
            "A Game of Thrones",
            "An Instance of the Fingerpost",
            "The Two Towers"
        ]
    );
}

#[test]
fn test_validation_through_items() {
    let book = Book::new("Foo", "/library/books/Foo/Foo.epub");
    assert!(book.is_valid());

    let unnamed = Book::new("  ", "");
    let errors = unnamed.validate().expect_err("Should be invalid");
    assert_eq!(errors.len(), 2);
}

#[test]
fn test_book_json_shape() {
    let mut book = Book::new("Foo", "/library/books/Foo/Foo.epub");
    book.series_name = Some("Foo Saga".to_string());

    let value = serde_json::to_value(&book).expect("Should serialize");
    assert_eq!(value["name"], "Foo");
    assert_eq!(value["series_name"], "Foo Saga");
    assert!(value.get("item").is_none());
}
