// tests/revision_engine.rs
use cms_articles::application::{
    commands::articles::{
        DeleteArticleCommand, DeleteContentCommand, PublishCommand, RevertCommand,
        SetTitleCommand, UnpublishCommand, UpdateArticleCommand, UpdateContentCommand,
    },
    dto::LanguageStatus,
    error::ApplicationError,
    queries::articles::GetArticleByIdQuery,
};
use cms_articles::domain::{article::ArticleEvent, errors::DomainError};
use serde_json::json;
use std::sync::Arc;

mod support;

use support::{
    WIDE_TEMPLATE, author, content_shape, editor, file_test_app, placeholder, test_app, title_in,
};

const DEFAULT: i64 = 0;
const DIRTY: i64 = 1;

#[tokio::test]
async fn publish_links_draft_and_public_both_ways() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    assert!(draft.is_draft);
    assert_eq!(draft.public_id, None);

    let draft = app.publish(draft.id, "en").await;
    let public = app.load_public(&draft).await;

    assert!(draft.is_draft);
    assert!(!public.is_draft);
    assert_eq!(public.public_id, Some(draft.id));
    assert_eq!(draft.public_id, Some(public.id));

    let draft_title = title_in(&draft, "en");
    let public_title = title_in(&public, "en");
    assert_eq!(draft_title.public_id, Some(public_title.id));
    assert_eq!(public_title.public_id, Some(draft_title.id));
}

#[tokio::test]
async fn publishing_twice_keeps_the_public_side_stable() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    app.add_block(draft.id, "content", "en", "text", None, json!({"body": "first"}))
        .await;

    let first = app.publish(draft.id, "en").await;
    let public_after_first = app.load_public(&first).await;
    let second = app.publish(draft.id, "en").await;
    let public_after_second = app.load_public(&second).await;

    assert_eq!(first.public_id, second.public_id);
    assert_eq!(title_in(&first, "en").publisher_state, DEFAULT);
    assert_eq!(title_in(&second, "en").publisher_state, DEFAULT);

    let before = title_in(&public_after_first, "en");
    let after = title_in(&public_after_second, "en");
    assert_eq!(before.title, after.title);
    assert_eq!(before.slug, after.slug);
    assert!(after.published);
    assert_eq!(public_after_first.template, public_after_second.template);
    assert_eq!(
        public_after_first.publication_date,
        public_after_second.publication_date
    );
    assert_eq!(
        content_shape(&public_after_first, "content", "en"),
        content_shape(&public_after_second, "content", "en")
    );
    assert_eq!(public_after_second.placeholders.len(), 1);
}

#[tokio::test]
async fn editing_tracked_title_fields_marks_the_language_dirty() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    let draft = app.publish(draft.id, "en").await;
    assert_eq!(title_in(&draft, "en").publisher_state, DEFAULT);

    let edited = app.set_title(draft.id, "en", "Hello again").await;

    assert_eq!(title_in(&edited, "en").publisher_state, DIRTY);
    assert_eq!(edited.status["en"], LanguageStatus::Dirty);
}

#[tokio::test]
async fn editing_untracked_title_fields_keeps_the_language_clean() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    let draft = app.publish(draft.id, "en").await;

    let edited = app
        .services
        .article_commands
        .set_title(
            &editor(),
            SetTitleCommand {
                article_id: draft.id,
                language: "en".into(),
                title: "Hello".into(),
                image_id: Some(42),
                ..SetTitleCommand::default()
            },
        )
        .await
        .unwrap();

    let title = title_in(&edited, "en");
    assert_eq!(title.image_id, Some(42));
    assert_eq!(title.publisher_state, DEFAULT);
    assert_eq!(edited.status["en"], LanguageStatus::Clean);
}

#[tokio::test]
async fn editing_tracked_article_fields_marks_every_language_dirty() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    app.set_title(draft.id, "de", "Hallo").await;
    app.publish(draft.id, "en").await;
    let draft = app.publish(draft.id, "de").await;
    assert_eq!(draft.status["en"], LanguageStatus::Clean);
    assert_eq!(draft.status["de"], LanguageStatus::Clean);

    let updated = app
        .services
        .article_commands
        .update_article(
            &editor(),
            UpdateArticleCommand {
                id: draft.id,
                login_required: Some(true),
                ..UpdateArticleCommand::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.login_required);
    assert_eq!(updated.status["en"], LanguageStatus::Dirty);
    assert_eq!(updated.status["de"], LanguageStatus::Dirty);
}

#[tokio::test]
async fn content_edits_mark_only_their_language_dirty() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    app.set_title(draft.id, "de", "Hallo").await;
    app.publish(draft.id, "en").await;
    app.publish(draft.id, "de").await;

    let block = app
        .add_block(draft.id, "content", "en", "text", None, json!({"body": "x"}))
        .await;
    let after_add = app.load(draft.id).await;
    assert_eq!(after_add.status["en"], LanguageStatus::Dirty);
    assert_eq!(after_add.status["de"], LanguageStatus::Clean);

    app.publish(draft.id, "en").await;
    app.services
        .article_commands
        .update_content(
            &editor(),
            UpdateContentCommand {
                block_id: block.id,
                payload: json!({"body": "y"}),
            },
        )
        .await
        .unwrap();
    assert_eq!(app.load(draft.id).await.status["en"], LanguageStatus::Dirty);

    app.publish(draft.id, "en").await;
    app.services
        .article_commands
        .delete_content(&editor(), DeleteContentCommand { block_id: block.id })
        .await
        .unwrap();
    let after_delete = app.load(draft.id).await;
    assert_eq!(after_delete.status["en"], LanguageStatus::Dirty);
    assert!(content_shape(&after_delete, "content", "en").is_empty());
}

#[tokio::test]
async fn publish_replicates_every_slot_in_tree_order() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    app.services
        .article_commands
        .update_article(
            &editor(),
            UpdateArticleCommand {
                id: draft.id,
                template: Some(WIDE_TEMPLATE.into()),
                ..UpdateArticleCommand::default()
            },
        )
        .await
        .unwrap();

    let row = app
        .add_block(draft.id, "content", "en", "row", None, json!({"columns": 2}))
        .await;
    app.add_block(draft.id, "content", "en", "text", Some(row.id), json!({"body": "left"}))
        .await;
    app.add_block(draft.id, "content", "en", "text", Some(row.id), json!({"body": "right"}))
        .await;
    app.add_block(draft.id, "content", "en", "quote", None, json!({"body": "end"}))
        .await;
    app.add_block(draft.id, "sidebar", "en", "link", None, json!({"href": "/about"}))
        .await;
    app.add_block(draft.id, "content", "de", "text", None, json!({"body": "hallo"}))
        .await;

    let draft = app.publish(draft.id, "en").await;
    let public = app.load_public(&draft).await;

    for slot in ["content", "sidebar"] {
        assert_eq!(
            content_shape(&public, slot, "en"),
            content_shape(&draft, slot, "en"),
            "slot {slot} differs after publish"
        );
    }
    let content = content_shape(&public, "content", "en");
    let kinds: Vec<&str> = content.iter().map(|(kind, ..)| kind.as_str()).collect();
    assert_eq!(kinds, ["row", "text", "text", "quote"]);
    assert_eq!(content[1].2, 2);
    assert!(content_shape(&public, "content", "de").is_empty());

    let public_row = &placeholder(&public, "content").blocks[0];
    let children: Vec<_> = placeholder(&public, "content")
        .blocks
        .iter()
        .filter(|b| b.parent_id == Some(public_row.id))
        .collect();
    assert_eq!(children.len(), 2);
    assert_ne!(public_row.id, row.id);
}

#[tokio::test]
async fn unpublish_hides_the_language_but_keeps_the_rows() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    app.add_block(draft.id, "content", "en", "text", None, json!({"body": "x"}))
        .await;
    let published = app.publish(draft.id, "en").await;
    let public_id = published.public_id.unwrap();

    let draft = app
        .services
        .article_commands
        .unpublish(
            &editor(),
            UnpublishCommand {
                article_id: published.id,
                language: "en".into(),
            },
        )
        .await
        .unwrap();
    let public = app.load(public_id).await;

    let public_title = title_in(&public, "en");
    assert!(!public_title.published);
    assert!(content_shape(&public, "content", "en").is_empty());
    assert_eq!(public.placeholders.len(), 1);

    let draft_title = title_in(&draft, "en");
    assert!(!draft_title.published);
    assert_eq!(draft_title.publisher_state, DIRTY);
    assert_eq!(draft_title.title, "Hello");
    assert_eq!(content_shape(&draft, "content", "en").len(), 1);
    assert_eq!(draft.public_id, Some(public_id));
    assert_eq!(draft.status["en"], LanguageStatus::Unpublished);
}

#[tokio::test]
async fn revert_restores_the_live_version() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    app.add_block(draft.id, "content", "en", "text", None, json!({"body": "live"}))
        .await;
    let published = app.publish(draft.id, "en").await;

    app.set_title(draft.id, "en", "Scratch").await;
    app.add_block(draft.id, "content", "en", "text", None, json!({"body": "wip"}))
        .await;

    let reverted = app
        .services
        .article_commands
        .revert_to_live(
            &editor(),
            RevertCommand {
                article_id: draft.id,
                language: "en".into(),
            },
        )
        .await
        .unwrap();
    let public = app.load_public(&published).await;

    let title = title_in(&reverted, "en");
    assert_eq!(title.title, "Hello");
    assert_eq!(title.publisher_state, DEFAULT);
    assert!(title.published);
    assert_eq!(
        content_shape(&reverted, "content", "en"),
        content_shape(&public, "content", "en")
    );
    assert_eq!(app.events.kinds(), ["published", "reverted"]);
}

#[tokio::test]
async fn revert_right_after_publish_changes_nothing() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    app.add_block(draft.id, "content", "en", "text", None, json!({"body": "live"}))
        .await;
    let published = app.publish(draft.id, "en").await;

    let reverted = app
        .services
        .article_commands
        .revert_to_live(
            &editor(),
            RevertCommand {
                article_id: draft.id,
                language: "en".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(title_in(&reverted, "en").title, title_in(&published, "en").title);
    assert_eq!(title_in(&reverted, "en").publisher_state, DEFAULT);
    assert_eq!(
        content_shape(&reverted, "content", "en"),
        content_shape(&published, "content", "en")
    );
}

#[tokio::test]
async fn revert_after_unpublish_keeps_the_article_offline() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    app.add_block(draft.id, "content", "en", "text", None, json!({"body": "live"}))
        .await;
    let published = app.publish(draft.id, "en").await;
    app.set_title(draft.id, "en", "Scratch").await;
    app.services
        .article_commands
        .unpublish(
            &editor(),
            UnpublishCommand {
                article_id: draft.id,
                language: "en".into(),
            },
        )
        .await
        .unwrap();

    let reverted = app
        .services
        .article_commands
        .revert_to_live(
            &editor(),
            RevertCommand {
                article_id: draft.id,
                language: "en".into(),
            },
        )
        .await
        .unwrap();
    let public = app.load_public(&published).await;

    let title = title_in(&reverted, "en");
    assert_eq!(title.title, "Hello");
    assert!(!title.published);
    assert_eq!(title.publisher_state, DEFAULT);
    assert_eq!(reverted.status["en"], LanguageStatus::Unpublished);
    assert!(!title_in(&public, "en").published);
    assert!(content_shape(&public, "content", "en").is_empty());
    assert_eq!(
        content_shape(&reverted, "content", "en"),
        content_shape(&public, "content", "en")
    );
    assert_eq!(app.events.kinds(), ["published", "unpublished", "reverted"]);
}

#[tokio::test]
async fn publishing_a_missing_translation_is_rejected() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;

    let result = app
        .services
        .article_commands
        .publish(
            &editor(),
            PublishCommand {
                article_id: draft.id,
                language: "de".into(),
            },
        )
        .await;

    assert!(matches!(result, Err(ApplicationError::Validation(_))));
    assert_eq!(app.load(draft.id).await.public_id, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_publishes_of_one_language_serialize() {
    let app = file_test_app().await;
    let draft = app.create_draft("Hello").await;
    let first = app
        .add_block(draft.id, "content", "en", "text", None, json!({"body": "a"}))
        .await;
    app.add_block(draft.id, "content", "en", "text", Some(first.id), json!({"body": "b"}))
        .await;

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let services = Arc::clone(&app.services);
            tokio::spawn(async move {
                services
                    .article_commands
                    .publish(
                        &editor(),
                        PublishCommand {
                            article_id: draft.id,
                            language: "en".into(),
                        },
                    )
                    .await
            })
        })
        .collect();
    for task in tasks {
        let outcome = task.await.expect("publish task");
        assert!(outcome.is_ok(), "concurrent publish failed: {outcome:?}");
    }

    let draft = app.load(draft.id).await;
    let public = app.load_public(&draft).await;
    assert_eq!(public.placeholders.len(), 1);
    assert_eq!(
        content_shape(&public, "content", "en"),
        content_shape(&draft, "content", "en")
    );
    assert_eq!(title_in(&draft, "en").publisher_state, DEFAULT);
    let (articles,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(articles, 2);
}

#[tokio::test]
async fn hello_article_lifecycle() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    assert_eq!(draft.languages, ["en"]);

    let draft = app.publish(draft.id, "en").await;
    let public = app.load_public(&draft).await;
    assert_eq!(title_in(&public, "en").title, "Hello");
    assert!(title_in(&public, "en").published);
    assert_eq!(title_in(&draft, "en").publisher_state, DEFAULT);

    let draft = app.set_title(draft.id, "en", "Hello 2").await;
    assert_eq!(title_in(&draft, "en").publisher_state, DIRTY);
    let public = app.load_public(&draft).await;
    assert_eq!(title_in(&public, "en").title, "Hello");

    let draft = app.publish(draft.id, "en").await;
    let public = app.load_public(&draft).await;
    assert_eq!(title_in(&public, "en").title, "Hello 2");
    assert_eq!(title_in(&draft, "en").publisher_state, DEFAULT);
}

#[tokio::test]
async fn hello_article_unpublished() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    app.add_block(draft.id, "content", "en", "text", None, json!({"body": "x"}))
        .await;
    let draft = app.publish(draft.id, "en").await;

    let draft = app
        .services
        .article_commands
        .unpublish(
            &editor(),
            UnpublishCommand {
                article_id: draft.id,
                language: "en".into(),
            },
        )
        .await
        .unwrap();
    let public = app.load_public(&draft).await;

    assert!(!title_in(&public, "en").published);
    assert!(content_shape(&public, "content", "en").is_empty());
    assert_eq!(title_in(&draft, "en").publisher_state, DIRTY);
    assert!(!title_in(&draft, "en").published);
}

#[tokio::test]
async fn deleting_a_draft_removes_the_whole_pair() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    app.add_block(draft.id, "content", "en", "text", None, json!({"body": "x"}))
        .await;
    let draft = app.publish(draft.id, "en").await;
    let public_id = draft.public_id.unwrap();

    app.services
        .article_commands
        .delete_article(&support::admin(), DeleteArticleCommand { id: draft.id })
        .await
        .unwrap();

    for id in [draft.id, public_id] {
        let lookup = app
            .services
            .article_queries
            .get_article_by_id(Some(&editor()), GetArticleByIdQuery { id })
            .await;
        assert!(matches!(lookup, Err(ApplicationError::NotFound(_))), "{id} still resolves");
    }
    for table in ["articles", "article_titles", "placeholders", "content_blocks"] {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&app.pool)
            .await
            .unwrap();
        assert_eq!(count, 0, "{table} is not empty");
    }
    assert!(matches!(
        app.events.events().last(),
        Some(ArticleEvent::Deleted { public_id: Some(_), .. })
    ));
}

#[tokio::test]
async fn delete_is_all_or_nothing_when_a_title_is_still_referenced() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    let draft = app.publish(draft.id, "en").await;
    let public = app.load_public(&draft).await;

    sqlx::query(
        "CREATE TABLE redirects (id INTEGER PRIMARY KEY, \
         title_id INTEGER NOT NULL REFERENCES article_titles (id))",
    )
    .execute(&app.pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO redirects (title_id) VALUES (?)")
        .bind(title_in(&public, "en").id)
        .execute(&app.pool)
        .await
        .unwrap();

    let result = app
        .services
        .article_commands
        .delete_article(&support::admin(), DeleteArticleCommand { id: draft.id })
        .await;

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::Integrity(_)))
    ));
    let still_there = app.load(draft.id).await;
    assert_eq!(still_there.titles.len(), 1);
    assert_eq!(still_there.placeholders.len(), 1);
    assert_eq!(app.load(public.id).await.titles.len(), 1);
    assert_eq!(app.events.kinds(), ["published"]);
}

#[tokio::test]
async fn public_rows_cannot_be_edited_or_published() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    let draft = app.publish(draft.id, "en").await;
    let public_id = draft.public_id.unwrap();

    let publish = app
        .services
        .article_commands
        .publish(
            &editor(),
            PublishCommand {
                article_id: public_id,
                language: "en".into(),
            },
        )
        .await;
    assert!(matches!(
        publish,
        Err(ApplicationError::Domain(DomainError::PublicIsUnmodifiable(_)))
    ));

    let edit = app
        .services
        .article_commands
        .set_title(
            &editor(),
            SetTitleCommand {
                article_id: public_id,
                language: "en".into(),
                title: "Sneaky".into(),
                ..SetTitleCommand::default()
            },
        )
        .await;
    assert!(matches!(
        edit,
        Err(ApplicationError::Domain(DomainError::PublicIsUnmodifiable(_)))
    ));
}

#[tokio::test]
async fn revert_and_unpublish_need_a_public_version() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;

    let revert = app
        .services
        .article_commands
        .revert_to_live(
            &editor(),
            RevertCommand {
                article_id: draft.id,
                language: "en".into(),
            },
        )
        .await;
    assert!(matches!(
        revert,
        Err(ApplicationError::Domain(DomainError::PublicVersionNeeded(_)))
    ));

    let unpublish = app
        .services
        .article_commands
        .unpublish(
            &editor(),
            UnpublishCommand {
                article_id: draft.id,
                language: "en".into(),
            },
        )
        .await;
    assert!(matches!(
        unpublish,
        Err(ApplicationError::Domain(DomainError::PublicVersionNeeded(_)))
    ));
    assert!(app.events.events().is_empty());
}

#[tokio::test]
async fn publish_rejects_languages_outside_the_site_without_writing() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;

    let result = app
        .services
        .article_commands
        .publish(
            &editor(),
            PublishCommand {
                article_id: draft.id,
                language: "fr".into(),
            },
        )
        .await;

    assert!(matches!(result, Err(ApplicationError::Validation(_))));
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(app.load(draft.id).await.public_id, None);
}

#[tokio::test]
async fn authors_cannot_publish() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;

    let result = app
        .services
        .article_commands
        .publish(
            &author(),
            PublishCommand {
                article_id: draft.id,
                language: "en".into(),
            },
        )
        .await;

    assert!(matches!(result, Err(ApplicationError::Forbidden(_))));
    assert!(app.events.events().is_empty());
}

#[tokio::test]
async fn publish_stamps_a_missing_publication_date() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    assert_eq!(draft.publication_date, None);

    let draft = app.publish(draft.id, "en").await;
    let public = app.load_public(&draft).await;

    assert_eq!(draft.publication_date, Some(support::fixed_now()));
    assert_eq!(public.publication_date, Some(support::fixed_now()));
    assert_eq!(public.order_date, support::fixed_now());
}

#[tokio::test]
async fn events_are_published_after_each_transition() {
    let app = test_app().await;
    let draft = app.create_draft("Hello").await;
    let draft = app.publish(draft.id, "en").await;
    app.services
        .article_commands
        .unpublish(
            &editor(),
            UnpublishCommand {
                article_id: draft.id,
                language: "en".into(),
            },
        )
        .await
        .unwrap();

    let events = app.events.events();
    assert_eq!(app.events.kinds(), ["published", "unpublished"]);
    match &events[0] {
        ArticleEvent::Published {
            draft_id,
            public_id,
            language,
            ..
        } => {
            assert_eq!(i64::from(*draft_id), draft.id);
            assert_eq!(Some(i64::from(*public_id)), draft.public_id);
            assert_eq!(language.as_str(), "en");
        }
        other => panic!("unexpected event {other:?}"),
    }
}
