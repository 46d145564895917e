use crate::db::Store;

struct DemoWord {
    french: &'static str,
    english: &'static str,
}

const DEMO_WORDS: &[DemoWord] = &[
    DemoWord {
        french: "bonjour",
        english: "hello",
    },
    DemoWord {
        french: "au revoir",
        english: "goodbye",
    },
    DemoWord {
        french: "merci",
        english: "thank you",
    },
];

/// Group name and the 1-based positions in `DEMO_WORDS` it links to.
const DEMO_GROUPS: &[(&str, &[usize])] = &[("Basics", &[1, 2]), ("Greetings", &[1])];

struct DemoActivity {
    name: &'static str,
    url: &'static str,
    thumbnail_url: &'static str,
    description: &'static str,
}

const DEMO_ACTIVITIES: &[DemoActivity] = &[
    DemoActivity {
        name: "Flashcards",
        url: "/activities/flashcards",
        thumbnail_url: "/thumbnails/flashcards.jpg",
        description: "Practice with flashcards",
    },
    DemoActivity {
        name: "Quiz",
        url: "/activities/quiz",
        thumbnail_url: "/thumbnails/quiz.jpg",
        description: "Test your knowledge",
    },
];

/// Loads the demo vocabulary into an empty store. A store that already has words is left alone.
pub async fn seed_demo_data(store: &Store) -> Result<bool, sqlx::Error> {
    let pool = store.pool();

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM words")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::debug!(words = existing, "store already has words, skipping demo seed");
        return Ok(false);
    }

    let mut tx = pool.begin().await?;

    let mut word_ids = Vec::with_capacity(DEMO_WORDS.len());
    for word in DEMO_WORDS {
        let parts = serde_json::json!({ "french": word.french, "english": word.english });
        let id = sqlx::query("INSERT INTO words (parts) VALUES (?)")
            .bind(parts.to_string())
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
        word_ids.push(id);
    }

    for &(name, members) in DEMO_GROUPS {
        let group_id = sqlx::query("INSERT INTO groups (name) VALUES (?)")
            .bind(name)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        for &position in members {
            let Some(&word_id) = position.checked_sub(1).and_then(|i| word_ids.get(i)) else {
                continue;
            };
            sqlx::query("INSERT INTO word_groups (word_id, group_id) VALUES (?, ?)")
                .bind(word_id)
                .bind(group_id)
                .execute(&mut *tx)
                .await?;
        }

        // words_count is a cache; recompute it from the link rows rather than trusting the input.
        sqlx::query(
            r#"
            UPDATE groups
            SET words_count = (SELECT COUNT(*) FROM word_groups WHERE group_id = ?)
            WHERE id = ?
            "#,
        )
        .bind(group_id)
        .bind(group_id)
        .execute(&mut *tx)
        .await?;
    }

    for activity in DEMO_ACTIVITIES {
        sqlx::query(
            r#"
            INSERT INTO study_activities (name, url, thumbnail_url, description)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(activity.name)
        .bind(activity.url)
        .bind(activity.thumbnail_url)
        .bind(activity.description)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        words = DEMO_WORDS.len(),
        groups = DEMO_GROUPS.len(),
        activities = DEMO_ACTIVITIES.len(),
        "seeded demo data"
    );

    Ok(true)
}
