//! Integration tests for the enrollment registry and request workflow,
//! running against the real schema and migrations.

use campus_config::DatabaseConfig;
use campus_database::{
    initialize_database, CourseRepository, CreateCourseRequest, CreateUserRequest,
    EnrollmentError, EnrollmentRequestError, EnrollmentState, EnrollmentType, PageRequest,
    UserRepository, UserRole,
};
use campus_enrollments::{
    EnrollmentFilter, EnrollmentRequestFilter, EnrollmentRequestService, EnrollmentService,
};
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

async fn create_test_database() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test_enrollments.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let config = DatabaseConfig {
        url: db_url,
        max_connections: 1,
    };

    let pool = initialize_database(&config)
        .await
        .expect("failed to initialize test database");
    (pool, temp_dir)
}

async fn seed_user(pool: &SqlitePool, email: &str, username: &str) -> Uuid {
    UserRepository::new(pool.clone())
        .create(&CreateUserRequest {
            email: email.to_string(),
            username: username.to_string(),
            role: UserRole::Student,
        })
        .await
        .expect("failed to seed user")
        .id
}

async fn seed_course(pool: &SqlitePool, title: &str) -> Uuid {
    CourseRepository::new(pool.clone())
        .create(&CreateCourseRequest {
            title: title.to_string(),
            description: None,
            image_url: None,
        })
        .await
        .expect("failed to seed course")
        .id
}

#[tokio::test]
async fn create_enrollment_twice_fails_with_already_enrolled() {
    let (pool, _temp_dir) = create_test_database().await;
    let service = EnrollmentService::new(pool.clone());
    let user_id = seed_user(&pool, "a@example.com", "alice").await;
    let course_id = seed_course(&pool, "Rust 101").await;

    service
        .create_enrollment(user_id, course_id, EnrollmentType::Student)
        .await
        .unwrap();

    let err = service
        .create_enrollment(user_id, course_id, EnrollmentType::Student)
        .await
        .unwrap_err();
    assert!(matches!(err, EnrollmentError::AlreadyEnrolled { .. }));
}

#[tokio::test]
async fn create_enrollment_requires_existing_user_and_course() {
    let (pool, _temp_dir) = create_test_database().await;
    let service = EnrollmentService::new(pool.clone());
    let user_id = seed_user(&pool, "a@example.com", "alice").await;
    let course_id = seed_course(&pool, "Rust 101").await;

    let err = service
        .create_enrollment(Uuid::new_v4(), course_id, EnrollmentType::Student)
        .await
        .unwrap_err();
    assert!(matches!(err, EnrollmentError::UserNotFound(_)));

    let err = service
        .create_enrollment(user_id, Uuid::new_v4(), EnrollmentType::Student)
        .await
        .unwrap_err();
    assert!(matches!(err, EnrollmentError::CourseNotFound(_)));
}

#[tokio::test]
async fn list_enrollments_filters_by_user_and_course() {
    let (pool, _temp_dir) = create_test_database().await;
    let service = EnrollmentService::new(pool.clone());
    let alice = seed_user(&pool, "a@example.com", "alice").await;
    let bob = seed_user(&pool, "b@example.com", "bob").await;
    let rust = seed_course(&pool, "Rust 101").await;
    let sql = seed_course(&pool, "SQL 201").await;

    for (user, course) in [(alice, rust), (alice, sql), (bob, rust)] {
        service
            .create_enrollment(user, course, EnrollmentType::Student)
            .await
            .unwrap();
    }

    let page = PageRequest::new(0, 10);
    let all = service
        .list_enrollments(EnrollmentFilter::All, &page)
        .await
        .unwrap();
    assert_eq!(all.total_elements, 3);

    let by_user = service
        .list_enrollments(EnrollmentFilter::ByUser(alice), &page)
        .await
        .unwrap();
    assert_eq!(by_user.total_elements, 2);

    let by_course = service
        .list_enrollments(EnrollmentFilter::ByCourse(rust), &page)
        .await
        .unwrap();
    assert_eq!(by_course.total_elements, 2);

    let by_pair = service
        .list_enrollments(EnrollmentFilter::ByUserAndCourse(bob, rust), &page)
        .await
        .unwrap();
    assert_eq!(by_pair.total_elements, 1);
}

#[tokio::test]
async fn get_and_delete_enrollment_report_not_found() {
    let (pool, _temp_dir) = create_test_database().await;
    let service = EnrollmentService::new(pool);

    let err = service.get_enrollment(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EnrollmentError::EnrollmentNotFound(_)));

    let err = service.delete_enrollment(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EnrollmentError::EnrollmentNotFound(_)));
}

#[tokio::test]
async fn duplicate_request_fails_in_any_state() {
    let (pool, _temp_dir) = create_test_database().await;
    let service = EnrollmentRequestService::new(pool.clone());
    let user_id = seed_user(&pool, "a@example.com", "alice").await;
    let course_id = seed_course(&pool, "Rust 101").await;

    let first = service
        .create_enrollment_request(course_id, user_id)
        .await
        .unwrap();
    assert_eq!(first.state, EnrollmentState::Pending);

    let err = service
        .create_enrollment_request(course_id, user_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EnrollmentRequestError::AlreadyRequested { .. }
    ));

    // A rejected request still blocks a new one for the same pair.
    service.reject_enrollment_request(first.id).await.unwrap();
    let err = service
        .create_enrollment_request(course_id, user_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EnrollmentRequestError::AlreadyRequested { .. }
    ));
}

#[tokio::test]
async fn accept_creates_exactly_one_enrollment() {
    let (pool, _temp_dir) = create_test_database().await;
    let requests = EnrollmentRequestService::new(pool.clone());
    let enrollments = EnrollmentService::new(pool.clone());
    let user_id = seed_user(&pool, "a@example.com", "alice").await;
    let course_id = seed_course(&pool, "Rust 101").await;

    let request = requests
        .create_enrollment_request(course_id, user_id)
        .await
        .unwrap();
    let (accepted, enrollment) = requests
        .accept_enrollment_request(request.id)
        .await
        .unwrap();

    assert_eq!(accepted.state, EnrollmentState::Accepted);
    assert_eq!(enrollment.user_id, user_id);
    assert_eq!(enrollment.course_id, course_id);

    let page = enrollments
        .list_enrollments(
            EnrollmentFilter::ByUserAndCourse(user_id, course_id),
            &PageRequest::new(0, 10),
        )
        .await
        .unwrap();
    assert_eq!(page.total_elements, 1);
}

#[tokio::test]
async fn terminal_requests_refuse_further_transitions() {
    let (pool, _temp_dir) = create_test_database().await;
    let service = EnrollmentRequestService::new(pool.clone());
    let user_id = seed_user(&pool, "a@example.com", "alice").await;
    let course_id = seed_course(&pool, "Rust 101").await;

    let request = service
        .create_enrollment_request(course_id, user_id)
        .await
        .unwrap();
    service.accept_enrollment_request(request.id).await.unwrap();

    let err = service
        .accept_enrollment_request(request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EnrollmentRequestError::AlreadyFinalized(_)));

    let err = service
        .reject_enrollment_request(request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EnrollmentRequestError::AlreadyFinalized(_)));
}

#[tokio::test]
async fn reject_leaves_no_enrollment_behind() {
    let (pool, _temp_dir) = create_test_database().await;
    let requests = EnrollmentRequestService::new(pool.clone());
    let enrollments = EnrollmentService::new(pool.clone());
    let user_id = seed_user(&pool, "a@example.com", "alice").await;
    let course_id = seed_course(&pool, "Rust 101").await;

    let request = requests
        .create_enrollment_request(course_id, user_id)
        .await
        .unwrap();
    let rejected = requests
        .reject_enrollment_request(request.id)
        .await
        .unwrap();
    assert_eq!(rejected.state, EnrollmentState::Rejected);

    let page = enrollments
        .list_enrollments(
            EnrollmentFilter::ByUserAndCourse(user_id, course_id),
            &PageRequest::new(0, 10),
        )
        .await
        .unwrap();
    assert_eq!(page.total_elements, 0);
}

#[tokio::test]
async fn accept_fails_when_enrollment_exists_out_of_band() {
    let (pool, _temp_dir) = create_test_database().await;
    let requests = EnrollmentRequestService::new(pool.clone());
    let enrollments = EnrollmentService::new(pool.clone());
    let user_id = seed_user(&pool, "a@example.com", "alice").await;
    let course_id = seed_course(&pool, "Rust 101").await;

    let request = requests
        .create_enrollment_request(course_id, user_id)
        .await
        .unwrap();
    enrollments
        .create_enrollment(user_id, course_id, EnrollmentType::Student)
        .await
        .unwrap();

    let err = requests
        .accept_enrollment_request(request.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EnrollmentRequestError::AlreadyEnrolled { .. }
    ));

    // The request must not be left accepted without its own enrollment.
    let page = requests
        .list_enrollment_requests(
            EnrollmentRequestFilter::ByUser(user_id),
            &PageRequest::new(0, 10),
        )
        .await
        .unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].state, EnrollmentState::Pending);
}

#[tokio::test]
async fn delete_request_works_regardless_of_state() {
    let (pool, _temp_dir) = create_test_database().await;
    let service = EnrollmentRequestService::new(pool.clone());
    let user_id = seed_user(&pool, "a@example.com", "alice").await;
    let course_id = seed_course(&pool, "Rust 101").await;

    let request = service
        .create_enrollment_request(course_id, user_id)
        .await
        .unwrap();
    service.accept_enrollment_request(request.id).await.unwrap();

    service.delete_enrollment_request(request.id).await.unwrap();
    let err = service
        .delete_enrollment_request(request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EnrollmentRequestError::RequestNotFound(_)));
}
