mod telemetry;

use anyhow::Context;
use campus_config::load as load_config;
use campus_database::{
    initialize_database, CreateCourseRequest, CreateUserRequest, EnrollmentType, UserRole,
};
use campus_enrollments::{EnrollmentRequestService, EnrollmentService};
use campus_notifications::NotificationService;
use clap::{Parser, Subcommand};
use sqlx::{Row, SqlitePool};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser)]
#[command(name = "campus-backend")]
#[command(about = "Campus backend (console by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump users, courses, enrollments, requests and notifications
    DumpData,
    /// Clear all data from the database
    ClearData,
    /// Seed the database with test data
    SeedData,
    /// Start interactive console (default)
    Console,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Console) {
        Commands::DumpData => dump_data().await,
        Commands::ClearData => clear_data().await,
        Commands::SeedData => seed_data().await,
        Commands::Console => run_console().await,
    }
}

async fn connect() -> anyhow::Result<SqlitePool> {
    let config = load_config().context("failed to load configuration")?;
    initialize_database(&config.database)
        .await
        .context("failed to initialise database")
}

async fn dump_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("dumping campus data from database");

    let pool = connect().await?;
    dump_tables(&pool).await
}

async fn dump_tables(pool: &SqlitePool) -> anyhow::Result<()> {
    println!("=== USERS ===");
    let users = sqlx::query(
        r#"
        SELECT id, email, username, role, created_at
        FROM users
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch users")?;

    if users.is_empty() {
        println!("No users found in database");
    } else {
        println!("Found {} users:", users.len());
        println!(
            "{:<38} {:<30} {:<20} {:<12} {:<27}",
            "ID", "Email", "Username", "Role", "Created At"
        );
        println!("{}", "-".repeat(130));

        for user in users {
            let id: String = user.get("id");
            let email: String = user.get("email");
            let username: String = user.get("username");
            let role: String = user.get("role");
            let created_at: String = user.get("created_at");

            println!(
                "{:<38} {:<30} {:<20} {:<12} {:<27}",
                id, email, username, role, created_at
            );
        }
    }

    println!("\n=== COURSES ===");
    let courses = sqlx::query(
        r#"
        SELECT id, title, description, created_at
        FROM courses
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch courses")?;

    if courses.is_empty() {
        println!("No courses found in database");
    } else {
        println!("Found {} courses:", courses.len());
        println!(
            "{:<38} {:<30} {:<40} {:<27}",
            "ID", "Title", "Description", "Created At"
        );
        println!("{}", "-".repeat(140));

        for course in courses {
            let id: String = course.get("id");
            let title: String = course.get("title");
            let description: Option<String> = course.get("description");
            let created_at: String = course.get("created_at");

            println!(
                "{:<38} {:<30} {:<40} {:<27}",
                id,
                title,
                description.as_deref().unwrap_or("NULL"),
                created_at
            );
        }
    }

    println!("\n=== ENROLLMENTS ===");
    let enrollments = sqlx::query(
        r#"
        SELECT id, user_id, course_id, enrollment_type, created_at
        FROM enrollments
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch enrollments")?;

    if enrollments.is_empty() {
        println!("No enrollments found in database");
    } else {
        println!("Found {} enrollments:", enrollments.len());
        println!(
            "{:<38} {:<38} {:<38} {:<12} {:<27}",
            "ID", "User ID", "Course ID", "Type", "Created At"
        );
        println!("{}", "-".repeat(155));

        for enrollment in enrollments {
            let id: String = enrollment.get("id");
            let user_id: String = enrollment.get("user_id");
            let course_id: String = enrollment.get("course_id");
            let enrollment_type: String = enrollment.get("enrollment_type");
            let created_at: String = enrollment.get("created_at");

            println!(
                "{:<38} {:<38} {:<38} {:<12} {:<27}",
                id, user_id, course_id, enrollment_type, created_at
            );
        }
    }

    println!("\n=== ENROLLMENT REQUESTS ===");
    let requests = sqlx::query(
        r#"
        SELECT id, course_id, user_id, state, requested_at
        FROM enrollment_requests
        ORDER BY requested_at ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch enrollment requests")?;

    if requests.is_empty() {
        println!("No enrollment requests found in database");
    } else {
        println!("Found {} enrollment requests:", requests.len());
        println!(
            "{:<38} {:<38} {:<38} {:<10} {:<27}",
            "ID", "Course ID", "User ID", "State", "Requested At"
        );
        println!("{}", "-".repeat(155));

        for request in requests {
            let id: String = request.get("id");
            let course_id: String = request.get("course_id");
            let user_id: String = request.get("user_id");
            let state: String = request.get("state");
            let requested_at: String = request.get("requested_at");

            println!(
                "{:<38} {:<38} {:<38} {:<10} {:<27}",
                id, course_id, user_id, state, requested_at
            );
        }
    }

    println!("\n=== NOTIFICATIONS ===");
    let notifications = sqlx::query(
        r#"
        SELECT id, recipient_id, sender_id, title, message, is_read, created_at
        FROM notifications
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch notifications")?;

    if notifications.is_empty() {
        println!("No notifications found in database");
    } else {
        println!("Found {} notifications:", notifications.len());
        println!(
            "{:<38} {:<38} {:<38} {:<16} {:<30} {:<6} {:<27}",
            "ID", "Recipient ID", "Sender ID", "Title", "Message (truncated)", "Read", "Created At"
        );
        println!("{}", "-".repeat(200));

        for notification in notifications {
            let id: String = notification.get("id");
            let recipient_id: String = notification.get("recipient_id");
            let sender_id: Option<String> = notification.get("sender_id");
            let title: String = notification.get("title");
            let message: String = notification.get("message");
            let is_read: bool = notification.get("is_read");
            let created_at: String = notification.get("created_at");

            let message_display = truncate_for_display(&message, 27);

            println!(
                "{:<38} {:<38} {:<38} {:<16} {:<30} {:<6} {:<27}",
                id,
                recipient_id,
                sender_id.unwrap_or("NULL".to_string()),
                title,
                message_display,
                is_read,
                created_at
            );
        }
    }

    Ok(())
}

// Counts characters, not bytes; slicing user-authored text on a byte index
// can land inside a multi-byte character and panic.
fn truncate_for_display(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

async fn clear_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("clearing all data from database");

    let pool = connect().await?;
    clear_tables(&pool).await
}

async fn clear_tables(pool: &SqlitePool) -> anyhow::Result<()> {
    // Dependents first, even though the schema cascades on user deletion
    let notifications = sqlx::query("DELETE FROM notifications")
        .execute(pool)
        .await
        .context("failed to delete notifications")?;

    let requests = sqlx::query("DELETE FROM enrollment_requests")
        .execute(pool)
        .await
        .context("failed to delete enrollment requests")?;

    let enrollments = sqlx::query("DELETE FROM enrollments")
        .execute(pool)
        .await
        .context("failed to delete enrollments")?;

    let courses = sqlx::query("DELETE FROM courses")
        .execute(pool)
        .await
        .context("failed to delete courses")?;

    let users = sqlx::query("DELETE FROM users")
        .execute(pool)
        .await
        .context("failed to delete users")?;

    println!("Database cleared:");
    println!("- {} notifications deleted", notifications.rows_affected());
    println!("- {} enrollment requests deleted", requests.rows_affected());
    println!("- {} enrollments deleted", enrollments.rows_affected());
    println!("- {} courses deleted", courses.rows_affected());
    println!("- {} users deleted", users.rows_affected());

    Ok(())
}

async fn seed_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("seeding database with test data");

    let pool = connect().await?;
    seed_tables(&pool).await
}

async fn seed_tables(pool: &SqlitePool) -> anyhow::Result<()> {
    let users = campus_database::UserRepository::new(pool.clone());
    let courses = campus_database::CourseRepository::new(pool.clone());
    let enrollments = EnrollmentService::new(pool.clone());
    let requests = EnrollmentRequestService::new(pool.clone());
    let notifications = NotificationService::new(pool.clone());

    let instructor = users
        .create(&CreateUserRequest {
            email: "instructor@campus.test".to_string(),
            username: "instructor".to_string(),
            role: UserRole::Instructor,
        })
        .await
        .context("failed to seed instructor")?;

    let alice = users
        .create(&CreateUserRequest {
            email: "alice@campus.test".to_string(),
            username: "alice".to_string(),
            role: UserRole::Student,
        })
        .await
        .context("failed to seed alice")?;

    let bob = users
        .create(&CreateUserRequest {
            email: "bob@campus.test".to_string(),
            username: "bob".to_string(),
            role: UserRole::Student,
        })
        .await
        .context("failed to seed bob")?;

    let course = courses
        .create(&CreateCourseRequest {
            title: "Distributed Systems".to_string(),
            description: Some("Consensus, replication and failure models".to_string()),
            image_url: None,
        })
        .await
        .context("failed to seed course")?;

    let broadcast = notifications
        .notify_all_users_course_created(&course, Some(instructor.id))
        .await
        .context("failed to broadcast course creation")?;

    // Instructor joins directly, Alice goes through the request workflow,
    // Bob stays pending.
    enrollments
        .create_enrollment(instructor.id, course.id, EnrollmentType::Instructor)
        .await
        .context("failed to enroll instructor")?;

    let alice_request = requests
        .create_enrollment_request(course.id, alice.id)
        .await
        .context("failed to create alice's request")?;
    requests
        .accept_enrollment_request(alice_request.id)
        .await
        .context("failed to accept alice's request")?;

    requests
        .create_enrollment_request(course.id, bob.id)
        .await
        .context("failed to create bob's request")?;

    let updated = notifications
        .notify_enrolled_users_course_updated(
            &course,
            Some(instructor.id),
            "Week 1 materials are online",
        )
        .await
        .context("failed to notify enrolled users")?;

    println!("Database seeded:");
    println!("- 3 users ({}, {}, {})", instructor.username, alice.username, bob.username);
    println!("- 1 course ({})", course.title);
    println!("- {} course-created notifications", broadcast);
    println!("- {} course-updated notifications", updated);

    Ok(())
}

async fn run_console() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting interactive console");

    let pool = connect().await?;

    println!("Campus Interactive Console");
    println!("Type commands like '/help', '/dump', '/seed', '/clear', '/quit'");
    println!("Use Ctrl+C or '/quit' to exit");
    println!("---");

    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();

    loop {
        print!("> ");
        std::io::Write::flush(&mut std::io::stdout())?;

        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break; // EOF
        }

        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        match command {
            "/quit" | "/exit" | "/q" => {
                println!("Goodbye!");
                break;
            }
            "/help" | "/h" => {
                println!("Available commands:");
                println!("  /help, /h     - Show this help");
                println!("  /dump, /d     - Dump all data");
                println!("  /seed, /s     - Seed with test data");
                println!("  /clear, /cl   - Clear all data");
                println!("  /quit, /q     - Exit console");
            }
            "/dump" | "/d" => {
                if let Err(error) = dump_tables(&pool).await {
                    println!("Dump failed: {error:#}");
                }
            }
            "/seed" | "/s" => {
                if let Err(error) = seed_tables(&pool).await {
                    println!("Seed failed: {error:#}");
                }
            }
            "/clear" | "/cl" => {
                if let Err(error) = clear_tables(&pool).await {
                    println!("Clear failed: {error:#}");
                }
            }
            other => {
                println!("Unknown command: {other} (try /help)");
            }
        }
    }

    Ok(())
}
