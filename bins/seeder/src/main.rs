//! Sample data seeder for Agora development.
//!
//! Creates a handful of users who follow each other, a few posts, and some
//! likes. Users that already exist are reused, so the seeder can run twice.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;

use agora_core::auth::{PasswordHasher, normalize_email};
use agora_core::social::{NewPost, NewUser, PostRepository as _, User, UserRepository as _};
use agora_db::{PostRepository, UserRepository};
use agora_shared::config::PasswordConfig;

/// Password shared by every seeded account.
const SEED_PASSWORD: &str = "agora-dev-password";

struct SeedUser {
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    location: &'static str,
    occupation: &'static str,
}

const USERS: [SeedUser; 4] = [
    SeedUser {
        first_name: "Ana",
        last_name: "Silva",
        email: "ana@agora.dev",
        location: "Porto, PT",
        occupation: "Product Designer",
    },
    SeedUser {
        first_name: "Ben",
        last_name: "Okafor",
        email: "ben@agora.dev",
        location: "Lagos, NG",
        occupation: "Backend Engineer",
    },
    SeedUser {
        first_name: "Chloe",
        last_name: "Martin",
        email: "chloe@agora.dev",
        location: "Lyon, FR",
        occupation: "Photographer",
    },
    SeedUser {
        first_name: "Daiki",
        last_name: "Sato",
        email: "daiki@agora.dev",
        location: "Osaka, JP",
        occupation: "Data Scientist",
    },
];

/// (author index, description)
const POSTS: [(usize, &str); 5] = [
    (0, "Sketching the new onboarding flow today."),
    (1, "Shaved 40ms off our p99 by fixing an N+1 query."),
    (2, "Golden hour over the Saône."),
    (3, "Trained my first model on the public transit dataset."),
    (0, "Anyone up for a design critique on Friday?"),
];

/// (follower index, followed index)
const FOLLOWS: [(usize, usize); 5] = [(0, 1), (1, 0), (2, 0), (3, 2), (1, 3)];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = agora_db::connect(&database_url, 2, 1)
        .await
        .context("Failed to connect to database")?;

    let users_repo = UserRepository::new(db.clone());
    let posts_repo = PostRepository::new(db.clone());

    println!("Seeding users...");
    let users = seed_users(&users_repo).await?;

    if posts_repo.list(None).await?.is_empty() {
        println!("Seeding posts...");
        seed_posts(&posts_repo, &users).await?;

        println!("Seeding follows...");
        for (follower, followed) in FOLLOWS {
            users_repo
                .toggle_follow(users[follower].id, users[followed].id)
                .await?;
        }
    } else {
        println!("  Posts already exist, skipping posts and follows...");
    }

    db.close().await?;
    println!("Seeding complete! Log in with any seeded email and password {SEED_PASSWORD:?}.");
    Ok(())
}

async fn seed_users(repo: &UserRepository) -> anyhow::Result<Vec<User>> {
    let hasher = PasswordHasher::from_config(&PasswordConfig::default())?;
    let password_hash = hasher.hash(SEED_PASSWORD)?;

    let mut users = Vec::with_capacity(USERS.len());
    for seed in &USERS {
        let email = normalize_email(seed.email);
        if let Some(existing) = repo.find_by_email(&email).await? {
            println!("  {email} already exists, skipping...");
            users.push(existing);
            continue;
        }

        let user = repo
            .insert(NewUser {
                email,
                password_hash: password_hash.clone(),
                first_name: seed.first_name.to_string(),
                last_name: seed.last_name.to_string(),
                location: seed.location.to_string(),
                occupation: seed.occupation.to_string(),
                picture_url: None,
            })
            .await?;
        println!("  Created {} ({})", user.email, user.id);
        users.push(user);
    }

    Ok(users)
}

async fn seed_posts(repo: &PostRepository, users: &[User]) -> anyhow::Result<()> {
    let mut created = Vec::with_capacity(POSTS.len());
    for (author, description) in POSTS {
        let post = repo
            .insert(NewPost::by(&users[author], description.to_string(), None))
            .await?;
        created.push(post.id);
    }

    // Everyone likes the first post; Ben also likes the rest.
    for user in users {
        repo.toggle_like(created[0], user.id).await?;
    }
    for post_id in &created[1..] {
        repo.toggle_like(*post_id, users[1].id).await?;
    }

    println!("  Created {} posts", created.len());
    Ok(())
}
