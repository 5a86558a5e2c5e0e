//! End-to-end tests for the automation loop against recording fakes.
//!
//! Run with:
//!   cargo test -p orchestrator --test integration_tests

mod common;

use std::sync::Arc;
use std::time::Duration;

use brain_core::ProviderKind;
use common::*;
use mock_brain::ScriptedBrain;
use orchestrator::actions::{comment, follow, like, post, research};
use orchestrator::{
    run_cycle, ActionReport, Pacing, Personality, RetryPolicy, SettingsOutcome, SetupChoice,
    SignUpForm, Supervisor, SupervisorConfig,
};
use xbot_database::tweet::{DUPLICATE_AVOIDED_TAG, POSTING_FAILURE_TAG};
use xbot_database::{api_key, credential, headline, like as likes, run_counter, timestamp, tweet};

fn quiet() -> Personality {
    Personality {
        research_enabled: false,
        post_enabled: false,
        follow_enabled: false,
        like_enabled: false,
        comment_enabled: false,
        ..Personality::default()
    }
}

fn instant() -> SupervisorConfig {
    SupervisorConfig {
        login_policy: RetryPolicy {
            pause_secs: (0.0, 0.0),
            ..RetryPolicy::login()
        },
        error_pause: Duration::ZERO,
        pacing: Pacing::Instant,
    }
}

// ============================================================================
// Research
// ============================================================================

mod research_tests {
    use super::*;

    #[tokio::test]
    async fn test_known_headlines_are_skipped() {
        let source = "https://news.example/feed";
        let known: Vec<String> = (0..5).map(|i| format!("Known headline number {}", i)).collect();
        let fresh: Vec<String> = (0..10).map(|i| format!("Fresh headline number {}", i)).collect();

        let mut harness = Harness::new(
            FakePlatform::new(),
            ScriptedBrain::new(Vec::<String>::new()),
            Personality {
                content_sources: vec![source.to_string()],
                ..quiet()
            },
        )
        .await;
        harness.cache.save_headlines(&known, source, 0).await.unwrap();
        harness.source = FakeSource::with(source, [known, fresh].concat());

        let summaries = research::fetch_headlines(&harness.ctx()).await.unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].new, 10);
        assert_eq!(summaries[0].skipped, 5);
        assert_eq!(headline::count_headlines(harness.db.pool()).await.unwrap(), 15);
        assert_eq!(run_counter::current(harness.db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_keeps_at_most_ten_new_per_source() {
        let source = "https://news.example/feed";
        let raw: Vec<String> = (0..40).map(|i| format!("Breaking story number {}", i)).collect();

        let mut harness = Harness::new(
            FakePlatform::new(),
            ScriptedBrain::new(Vec::<String>::new()),
            Personality {
                content_sources: vec![source.to_string(), "https://down.example".to_string()],
                ..quiet()
            },
        )
        .await;
        harness.source = FakeSource::with(source, raw);

        let report = research::run(&harness.ctx()).await.unwrap();

        assert_eq!(report, ActionReport::Completed(10));
        let stored = headline::get_headline(harness.db.pool(), "Breaking story number 0")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.run_number, Some(1));
    }
}

// ============================================================================
// Posting
// ============================================================================

mod post_tests {
    use super::*;

    #[tokio::test]
    async fn test_self_update_is_published_then_recorded() {
        let harness = Harness::new(
            FakePlatform::new(),
            ScriptedBrain::new(["\"Morning coffee and **code**\""]),
            Personality {
                post_enabled: true,
                ..quiet()
            },
        )
        .await;

        let report = post::run(&harness.ctx()).await.unwrap();

        assert_eq!(report, ActionReport::Completed(1));
        assert_eq!(harness.platform.state().published, vec!["Morning coffee and code"]);
        let tweets = tweet::list_recent_tweets(harness.db.pool(), 10).await.unwrap();
        assert_eq!(tweets[0].headline.as_deref(), Some(tweet::SELF_UPDATE_TAG));
        assert_eq!(
            tweet::recent_self_updates(harness.db.pool(), 10).await.unwrap(),
            vec!["Morning coffee and code"]
        );
    }

    #[tokio::test]
    async fn test_headline_tweet_marks_headline_posted() {
        let harness = Harness::new(
            FakePlatform::new(),
            ScriptedBrain::new(["1", "Trams are finally running on time #Berlin"]),
            Personality {
                post_enabled: true,
                research_enabled: true,
                tweet_type_ratio: 100,
                ..quiet()
            },
        )
        .await;
        let stored = vec![
            "Older headline about weather".to_string(),
            "Tram network expansion approved".to_string(),
        ];
        for (i, text) in stored.iter().enumerate() {
            headline::insert_headline(
                harness.db.pool(),
                text,
                "https://a",
                1,
                &format!("2025-03-01 0{}:00:00", i),
            )
            .await
            .unwrap();
        }

        let report = post::run(&harness.ctx()).await.unwrap();

        assert_eq!(report, ActionReport::Completed(1));
        // Newest first: index 1 is the older headline.
        let picked = headline::get_headline(harness.db.pool(), "Older headline about weather")
            .await
            .unwrap()
            .unwrap();
        assert!(picked.posted);
        let tweets = tweet::list_recent_tweets(harness.db.pool(), 10).await.unwrap();
        assert_eq!(tweets[0].headline.as_deref(), Some("Older headline about weather"));
        assert!(harness.brain.requests().await[0]
            .instruction
            .contains("Return only the number."));
    }

    #[tokio::test]
    async fn test_duplicate_tweet_is_replaced() {
        let harness = Harness::new(
            FakePlatform::new(),
            ScriptedBrain::new(["Same old", "Something new"]),
            Personality {
                post_enabled: true,
                tweet_type_ratio: 0,
                ..quiet()
            },
        )
        .await;
        tweet::insert_tweet(harness.db.pool(), tweet::SELF_UPDATE_TAG, "Same old", &timestamp::now())
            .await
            .unwrap();

        post::run(&harness.ctx()).await.unwrap();

        assert_eq!(harness.platform.state().published, vec!["Something new"]);
        let tweets = tweet::list_recent_tweets(harness.db.pool(), 1).await.unwrap();
        assert_eq!(tweets[0].headline.as_deref(), Some(DUPLICATE_AVOIDED_TAG));
    }

    #[tokio::test]
    async fn test_publish_failure_falls_back_to_fresh_self_update() {
        let platform = FakePlatform::new();
        platform.state().publish_failures = 3;
        let harness = Harness::new(
            platform,
            ScriptedBrain::new(["First attempt text", "Fallback text"]),
            Personality {
                post_enabled: true,
                ..quiet()
            },
        )
        .await;

        let report = post::run(&harness.ctx()).await.unwrap();

        assert_eq!(report, ActionReport::Completed(1));
        assert_eq!(harness.platform.count("publish"), 4);
        assert_eq!(harness.platform.count("refresh"), 2);
        assert_eq!(harness.platform.state().published, vec!["Fallback text"]);

        let tweets = tweet::list_recent_tweets(harness.db.pool(), 10).await.unwrap();
        assert_eq!(tweets.len(), 1);
        assert_eq!(tweets[0].headline.as_deref(), Some(POSTING_FAILURE_TAG));
    }
}

// ============================================================================
// Quotas and search-driven actions
// ============================================================================

mod action_tests {
    use super::*;

    #[tokio::test]
    async fn test_quota_at_limit_blocks_action() {
        let platform = FakePlatform::new().with_posts(vec![post("p1", "100", "alice", "Hello")]);
        let harness = Harness::new(
            platform,
            ScriptedBrain::new(Vec::<String>::new()),
            Personality {
                daily_like_limit: 1,
                ..quiet()
            },
        )
        .await;
        likes::record_like(harness.db.pool(), "99", &timestamp::now()).await.unwrap();

        let report = like::run(&harness.ctx()).await.unwrap();

        assert!(matches!(report, ActionReport::Skipped(_)));
        assert_eq!(harness.platform.count("like"), 0);
    }

    #[tokio::test]
    async fn test_post_limit_reached_publishes_nothing() {
        let harness = Harness::new(
            FakePlatform::new(),
            ScriptedBrain::new(["Fresh thoughts"]),
            Personality {
                post_enabled: true,
                daily_post_limit: 2,
                ..quiet()
            },
        )
        .await;
        for text in ["first", "second"] {
            tweet::insert_tweet(harness.db.pool(), tweet::SELF_UPDATE_TAG, text, &timestamp::now())
                .await
                .unwrap();
        }

        let report = post::run(&harness.ctx()).await.unwrap();

        assert!(matches!(report, ActionReport::Skipped(_)));
        assert!(harness.platform.state().published.is_empty());
        assert!(harness.brain.requests().await.is_empty());
        assert_eq!(tweet::list_recent_tweets(harness.db.pool(), 10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_follow_limit_reached_follows_nobody() {
        let platform = FakePlatform::new().with_accounts(vec![account("b1", "@fresh")]);
        let harness = Harness::new(
            platform,
            ScriptedBrain::new(Vec::<String>::new()),
            Personality {
                follow_keywords: vec!["trams".to_string()],
                daily_follow_limit: 1,
                ..quiet()
            },
        )
        .await;
        xbot_database::follow::record_follow(harness.db.pool(), "@earlier", &timestamp::now())
            .await
            .unwrap();

        let report = follow::run(&harness.ctx()).await.unwrap();

        assert!(matches!(report, ActionReport::Skipped(_)));
        assert!(harness.platform.state().followed.is_empty());
        assert_eq!(harness.platform.count("search:trams"), 0);
        assert!(!xbot_database::follow::is_followed(harness.db.pool(), "@fresh").await.unwrap());
    }

    #[tokio::test]
    async fn test_comment_limit_reached_replies_to_nobody() {
        let platform = FakePlatform::new().with_posts(vec![post("p1", "10", "alice", "Lovely weather")]);
        let harness = Harness::new(
            platform,
            ScriptedBrain::new(["Indeed!"]),
            Personality {
                daily_comment_limit: 1,
                ..quiet()
            },
        )
        .await;
        xbot_database::comment::record_comment(harness.db.pool(), "9", "bob", "Earlier reply", &timestamp::now())
            .await
            .unwrap();

        let report = comment::run(&harness.ctx()).await.unwrap();

        assert!(matches!(report, ActionReport::Skipped(_)));
        assert!(harness.platform.state().replies.is_empty());
        assert!(harness.brain.requests().await.is_empty());
        assert!(!xbot_database::comment::has_commented(harness.db.pool(), "10").await.unwrap());
    }

    #[tokio::test]
    async fn test_zero_limit_never_blocks() {
        let platform = FakePlatform::new().with_posts(vec![post("p1", "100", "alice", "Hello")]);
        let harness = Harness::new(
            platform,
            ScriptedBrain::new(Vec::<String>::new()),
            Personality {
                daily_like_limit: 0,
                ..quiet()
            },
        )
        .await;
        for i in 0..30 {
            likes::record_like(harness.db.pool(), &format!("old{}", i), &timestamp::now())
                .await
                .unwrap();
        }

        let report = like::run(&harness.ctx()).await.unwrap();

        assert_eq!(report, ActionReport::Completed(1));
        assert!(likes::is_liked(harness.db.pool(), "100").await.unwrap());
    }

    #[tokio::test]
    async fn test_like_skips_known_and_liked_posts() {
        let mut already = post("p0", "1", "bob", "Seen");
        already.liked = true;
        let platform = FakePlatform::new().with_posts(vec![
            already,
            post("p1", "2", "carol", "Stored"),
            post("p2", "3", "dave", "New"),
        ]);
        let harness = Harness::new(platform, ScriptedBrain::new(Vec::<String>::new()), quiet()).await;
        likes::record_like(harness.db.pool(), "2", "2024-01-01 00:00:00").await.unwrap();

        let report = like::run(&harness.ctx()).await.unwrap();

        assert_eq!(report, ActionReport::Completed(1));
        assert_eq!(harness.platform.state().liked, vec!["p2"]);
    }

    #[tokio::test]
    async fn test_follow_skips_self_and_known_accounts() {
        let platform = FakePlatform::new().with_accounts(vec![
            account("b0", "@newsbot"),
            account("b1", "@known"),
            account("b2", "@fresh"),
        ]);
        let harness = Harness::new(
            platform,
            ScriptedBrain::new(Vec::<String>::new()),
            Personality {
                follow_keywords: vec!["trams".to_string()],
                ..quiet()
            },
        )
        .await;
        xbot_database::follow::record_follow(harness.db.pool(), "@known", "2024-01-01 00:00:00")
            .await
            .unwrap();

        let report = follow::run(&harness.ctx()).await.unwrap();

        assert_eq!(report, ActionReport::Completed(1));
        assert_eq!(harness.platform.state().followed, vec!["@fresh"]);
        assert_eq!(harness.platform.count("search:trams"), 1);
    }

    #[tokio::test]
    async fn test_empty_page_stops_on_equal_heights() {
        let harness = Harness::new(
            FakePlatform::new(),
            ScriptedBrain::new(Vec::<String>::new()),
            quiet(),
        )
        .await;

        let report = like::run(&harness.ctx()).await.unwrap();

        assert_eq!(report, ActionReport::Completed(0));
        assert_eq!(harness.platform.count("scroll"), 1);
    }

    #[tokio::test]
    async fn test_comment_skips_restricted_and_records_reply() {
        let platform = FakePlatform::new().with_posts(vec![
            post("p1", "10", "alice", "Replies are off here"),
            post("p2", "11", "bob", "What a sunny day in the park"),
        ]);
        platform.state().restricted.insert("p1".to_string());
        let harness = Harness::new(platform, ScriptedBrain::new(["Enjoy the sun!"]), quiet()).await;

        let report = comment::run(&harness.ctx()).await.unwrap();

        assert_eq!(report, ActionReport::Completed(1));
        assert_eq!(harness.platform.state().replies, vec!["Enjoy the sun!"]);
        let stored = xbot_database::comment::list_comments_for_post(harness.db.pool(), "11")
            .await
            .unwrap();
        assert_eq!(stored[0].username.as_deref(), Some("bob"));

        let requests = harness.brain.requests().await;
        assert_eq!(requests.len(), 1);
        assert!(requests[0].instruction.contains("post by @bob"));
    }

    #[tokio::test]
    async fn test_connection_loss_escapes_executor() {
        let platform = FakePlatform::new();
        platform.state().connection_drops = 1;
        let harness = Harness::new(platform, ScriptedBrain::new(Vec::<String>::new()), quiet()).await;

        let err = like::run(&harness.ctx()).await.unwrap_err();
        assert!(err.is_connection());

        let mut cycle_harness = harness;
        cycle_harness.platform.state().connection_drops = 1;
        cycle_harness.settings.personality.like_enabled = true;
        assert!(run_cycle(&cycle_harness.ctx()).await.is_err());
    }
}

// ============================================================================
// Supervisor
// ============================================================================

mod supervisor_tests {
    use super::*;

    fn sign_up() -> SetupChoice {
        SetupChoice::SignUp(SignUpForm {
            username: "newsbot".to_string(),
            password: "hunter2".to_string(),
            email: "bot@example.com".to_string(),
            provider: ProviderKind::OpenAi,
            api_key: "sk-test".to_string(),
        })
    }

    fn sign_in(password: &str) -> SetupChoice {
        SetupChoice::SignIn {
            username: "newsbot".to_string(),
            password: password.to_string(),
        }
    }

    fn start(personality: Personality) -> SettingsOutcome {
        SettingsOutcome::Start(settings(personality))
    }

    fn brains(outputs: &str) -> Arc<FakeBrains> {
        Arc::new(FakeBrains {
            brain: Arc::new(ScriptedBrain::new(Vec::<String>::new()).repeat_when_exhausted(outputs)),
        })
    }

    #[tokio::test]
    async fn test_two_full_cycles_then_shutdown() {
        let db = test_db().await;
        let source = "https://news.example/feed";
        let platform = FakePlatform::new()
            .with_posts(vec![post("p1", "500", "alice", "Snow in April again")])
            .with_accounts(vec![account("b1", "@alice")]);
        let sessions = FakeSessions::new(platform.clone());
        let personality = Personality {
            content_sources: vec![source.to_string()],
            loop_count: 2,
            schedule_interval: 0,
            daily_post_limit: 0,
            daily_follow_limit: 0,
            daily_like_limit: 0,
            daily_comment_limit: 0,
            ..Personality::default()
        };
        let frontend = FakeFrontend::new(vec![sign_up()], vec![start(personality)]);
        let supervisor = Supervisor::new(
            db.clone(),
            frontend,
            sessions,
            brains("A perfectly ordinary update"),
            Arc::new(FakeSource::with(
                source,
                vec!["Harbour reopens after the storm".to_string()],
            )),
        )
        .with_config(instant());

        supervisor.run().await.unwrap();

        assert_eq!(run_counter::current(db.pool()).await.unwrap(), 2);
        assert_eq!(supervisor.sessions().opened(), 1);
        assert_eq!(platform.state().closed, 1);
        assert_eq!(platform.count("login"), 1);
        assert_eq!(platform.state().published.len(), 2);
        assert_eq!(platform.state().followed, vec!["@alice"]);
        assert_eq!(platform.state().liked, vec!["p1"]);
        assert_eq!(platform.state().replies.len(), 1);
        assert!(supervisor.frontend().errors().is_empty());

        let keys = api_key::list_api_keys(db.pool(), "newsbot").await.unwrap();
        assert_eq!(keys[0].custom_name, "OpenAI Default");
    }

    #[tokio::test]
    async fn test_sign_in_errors_return_to_setup() {
        let db = test_db().await;
        credential::create_credential(db.pool(), "newsbot", "hunter2", "bot@example.com", Some("openai"), Some("sk"))
            .await
            .unwrap();
        let frontend = FakeFrontend::new(
            vec![
                sign_in("wrong"),
                SetupChoice::SignIn {
                    username: "ghost".to_string(),
                    password: "x".to_string(),
                },
                sign_up(),
            ],
            Vec::new(),
        );
        let supervisor = Supervisor::new(
            db,
            frontend,
            FakeSessions::default(),
            brains("unused"),
            Arc::new(FakeSource::default()),
        )
        .with_config(instant());

        supervisor.run().await.unwrap();

        let errors = supervisor.frontend().errors();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("Incorrect password"));
        assert!(errors[1].contains("not found"));
        assert!(errors[2].contains("already exists"));
        assert_eq!(supervisor.sessions().opened(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_at_sign_in_returns_to_setup() {
        let db = test_db().await;
        db.close().await;
        let frontend = FakeFrontend::new(vec![sign_in("hunter2")], Vec::new());
        let supervisor = Supervisor::new(
            db,
            frontend,
            FakeSessions::default(),
            brains("unused"),
            Arc::new(FakeSource::default()),
        )
        .with_config(instant());

        supervisor.run().await.unwrap();

        let errors = supervisor.frontend().errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Could not load credentials:"));
        assert_eq!(supervisor.sessions().opened(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_at_sign_up_returns_to_setup() {
        let db = test_db().await;
        db.close().await;
        let frontend = FakeFrontend::new(vec![sign_up()], Vec::new());
        let supervisor = Supervisor::new(
            db,
            frontend,
            FakeSessions::default(),
            brains("unused"),
            Arc::new(FakeSource::default()),
        )
        .with_config(instant());

        supervisor.run().await.unwrap();

        let errors = supervisor.frontend().errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Sign-up failed:"));
        assert_eq!(supervisor.sessions().opened(), 0);
    }

    #[tokio::test]
    async fn test_invalid_settings_are_presented_again() {
        let db = test_db().await;
        let frontend = FakeFrontend::new(
            vec![sign_up()],
            vec![
                start(Personality {
                    loop_count: 0,
                    ..quiet()
                }),
                SettingsOutcome::Logout,
            ],
        );
        let supervisor = Supervisor::new(
            db,
            frontend,
            FakeSessions::default(),
            brains("unused"),
            Arc::new(FakeSource::default()),
        )
        .with_config(instant());

        supervisor.run().await.unwrap();

        assert_eq!(supervisor.frontend().errors().len(), 1);
        assert_eq!(supervisor.sessions().opened(), 0);
    }

    #[tokio::test]
    async fn test_login_exhaustion_closes_browser_and_reports() {
        let db = test_db().await;
        let platform = FakePlatform::new();
        platform.state().login_fails = true;
        let frontend = FakeFrontend::new(vec![sign_up()], vec![start(quiet())]);
        let supervisor = Supervisor::new(
            db,
            frontend,
            FakeSessions::new(platform.clone()),
            brains("unused"),
            Arc::new(FakeSource::default()),
        )
        .with_config(instant());

        supervisor.run().await.unwrap();

        assert_eq!(platform.count("login"), 3);
        assert_eq!(platform.count("refresh"), 2);
        assert_eq!(platform.state().closed, 1);
        let errors = supervisor.frontend().errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Login failed:"));
    }

    #[tokio::test]
    async fn test_connection_loss_rebuilds_session() {
        let db = test_db().await;
        let platform = FakePlatform::new().with_posts(vec![post("p1", "7", "alice", "Hi")]);
        platform.state().connection_drops = 1;
        let personality = Personality {
            like_enabled: true,
            loop_count: 1,
            ..quiet()
        };
        let frontend = FakeFrontend::new(
            vec![sign_up(), sign_in("hunter2")],
            vec![start(personality.clone()), start(personality)],
        );
        let supervisor = Supervisor::new(
            db.clone(),
            frontend,
            FakeSessions::new(platform.clone()),
            brains("unused"),
            Arc::new(FakeSource::default()),
        )
        .with_config(instant());

        supervisor.run().await.unwrap();

        assert_eq!(supervisor.sessions().opened(), 2);
        assert_eq!(platform.state().closed, 2);
        assert_eq!(platform.state().liked, vec!["p1"]);
        assert!(likes::is_liked(db.pool(), "7").await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_during_recovery_returns_to_setup() {
        let db = test_db().await;
        let platform = FakePlatform::new();
        platform.state().connection_drops = 1;
        let frontend = FakeFrontend::new(
            vec![sign_up(), sign_in("hunter2")],
            vec![
                start(Personality {
                    like_enabled: true,
                    ..quiet()
                }),
                SettingsOutcome::Logout,
            ],
        );
        let supervisor = Supervisor::new(
            db,
            frontend,
            FakeSessions::new(platform.clone()),
            brains("unused"),
            Arc::new(FakeSource::default()),
        )
        .with_config(instant());

        supervisor.run().await.unwrap();

        assert_eq!(supervisor.sessions().opened(), 1);
        assert_eq!(platform.state().closed, 1);
    }
}
