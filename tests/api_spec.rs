use axum::http::StatusCode;
use axum_test::TestServer;
use feedback_board::api::create_router;
use feedback_board::db::Database;
use feedback_board::models::*;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

fn setup() -> TestServer {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    db.ensure_board("View").expect("Failed to create board");
    let app = create_router(db);
    TestServer::new(app).expect("Failed to create test server")
}

fn setup_with_admin() -> TestServer {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    db.ensure_board("View").expect("Failed to create board");
    db.ensure_credential("admin", "secret")
        .expect("Failed to create credential");
    let app = create_router(db);
    TestServer::new(app).expect("Failed to create test server")
}

async fn login(server: &TestServer) -> String {
    let response = server
        .post("/login")
        .form(&json!({ "username": "admin", "password": "secret" }))
        .await;
    response.assert_status_ok();
    response.json::<LoginResponse>().token
}

async fn board(server: &TestServer, token: &str) -> Board {
    let response = server
        .get("/view")
        .add_header("Authorization", format!("Bearer {}", token))
        .await;
    response.assert_status_ok();
    response.json::<Board>()
}

fn survey_form(social: &str, tech: &str, task: &str) -> serde_json::Value {
    json!({
        "name": "Ada",
        "company": "Acme",
        "socialSkills": social,
        "techSkills": tech,
        "techTask": task,
        "socialExtra": "",
        "techExtra": "",
        "techTaskExtra": "",
        "extra": "overall",
    })
}

// ============================================================
// Health & home
// ============================================================

mod health {
    use super::*;

    #[tokio::test]
    async fn returns_ok() {
        let server = setup();

        let response = server.get("/health").await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn home_reports_the_service() {
        let server = setup();

        let response = server.get("/").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["service"], "feedback-board");
    }
}

// ============================================================
// Feedback submission
// ============================================================

mod feedback_submission {
    use super::*;

    #[tokio::test]
    async fn stores_the_entry_and_returns_it() {
        let server = setup();

        let response = server
            .post("/feedback")
            .form(&json!({ "name": "Ada", "company": "Acme", "feedback": "Great!" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let entry: FeedbackEntry = response.json();
        assert_eq!(entry.name, "Ada");
        assert_eq!(entry.company, "Acme");
        assert_eq!(entry.message, "Great!");
    }

    #[tokio::test]
    async fn blank_identity_fields_become_anonymous() {
        let server = setup();

        let response = server
            .post("/feedback")
            .form(&json!({ "name": "", "company": "Acme", "feedback": "Great!" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let entry: FeedbackEntry = response.json();
        assert_eq!(entry.name, "Anonymous");
        assert_eq!(entry.company, "Acme");
        assert_eq!(entry.message, "Great!");
    }

    #[tokio::test]
    async fn message_is_stored_verbatim() {
        let server = setup();

        let response = server
            .post("/feedback")
            .form(&json!({ "name": "Ada", "company": "Acme", "feedback": "  padded  " }))
            .await;

        let entry: FeedbackEntry = response.json();
        assert_eq!(entry.message, "  padded  ");
    }

    #[tokio::test]
    async fn entries_keep_submission_order() {
        let server = setup_with_admin();

        for i in 1..=3 {
            server
                .post("/feedback")
                .form(&json!({ "name": format!("Visitor {}", i), "company": "", "feedback": "hi" }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let token = login(&server).await;
        let board = board(&server, &token).await;
        let names: Vec<_> = board.feedback.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Visitor 1", "Visitor 2", "Visitor 3"]);
    }
}

// ============================================================
// Survey submission
// ============================================================

mod survey_submission {
    use super::*;

    #[tokio::test]
    async fn normalizes_ratings_in_question_order() {
        let server = setup();

        let response = server
            .post("/survey")
            .form(&survey_form("vGood", "poor", "norm"))
            .await;

        response.assert_status(StatusCode::CREATED);
        let entry: SurveyEntry = response.json();
        assert_eq!(
            entry.ratings,
            vec![
                RatingItem {
                    question: "Social Skills".to_string(),
                    rating: "Very Good".to_string(),
                    comment: "".to_string(),
                },
                RatingItem {
                    question: "Technical Skills".to_string(),
                    rating: "Poor".to_string(),
                    comment: "".to_string(),
                },
                RatingItem {
                    question: "Technical Task".to_string(),
                    rating: "Normal".to_string(),
                    comment: "".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn unknown_rating_codes_pass_through() {
        let server = setup();

        let response = server
            .post("/survey")
            .form(&survey_form("excellent", "good", "vPoor"))
            .await;

        let entry: SurveyEntry = response.json();
        assert_eq!(entry.ratings[0].rating, "excellent");
        assert_eq!(entry.ratings[1].rating, "Good");
        assert_eq!(entry.ratings[2].rating, "Very Poor");
    }

    #[tokio::test]
    async fn rating_comments_are_trimmed_by_default() {
        let server = setup();

        let mut form = survey_form("good", "good", "good");
        form["socialExtra"] = json!("  needs work  ");

        let response = server.post("/survey").form(&form).await;

        let entry: SurveyEntry = response.json();
        assert_eq!(entry.ratings[0].comment, "needs work");
    }

    #[tokio::test]
    async fn blank_identity_fields_become_anonymous() {
        let server = setup();

        let mut form = survey_form("good", "good", "good");
        form["name"] = json!("   ");
        form["company"] = json!("");

        let response = server.post("/survey").form(&form).await;

        let entry: SurveyEntry = response.json();
        assert_eq!(entry.name, "Anonymous");
        assert_eq!(entry.company, "Anonymous");
    }

    #[tokio::test]
    async fn get_redirects_to_the_feedback_form() {
        let server = setup();

        let response = server.get("/survey").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/feedback");
    }
}

// ============================================================
// Auth gate
// ============================================================

mod auth_gate {
    use super::*;

    #[tokio::test]
    async fn view_redirects_to_login_without_a_session() {
        let server = setup_with_admin();

        let response = server.get("/view").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");
    }

    #[tokio::test]
    async fn unknown_tokens_are_redirected_to_login() {
        let server = setup_with_admin();

        let response = server
            .get("/view")
            .add_header("Authorization", "Bearer not-a-session")
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");
    }

    #[tokio::test]
    async fn bad_credentials_redirect_back_to_login() {
        let server = setup_with_admin();

        let response = server
            .post("/login")
            .form(&json!({ "username": "admin", "password": "wrong" }))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");
    }

    #[tokio::test]
    async fn login_issues_a_working_session() {
        let server = setup_with_admin();

        let token = login(&server).await;
        let board = board(&server, &token).await;

        assert_eq!(board.name, "View");
        assert!(board.feedback.is_empty());
        assert!(board.surveys.is_empty());
    }

    #[tokio::test]
    async fn login_page_redirects_authenticated_callers_to_view() {
        let server = setup_with_admin();
        let token = login(&server).await;

        let response = server
            .get("/login")
            .add_header("Authorization", format!("Bearer {}", token))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/view");
    }

    #[tokio::test]
    async fn logout_destroys_the_session() {
        let server = setup_with_admin();
        let token = login(&server).await;

        let response = server
            .get("/logout")
            .add_header("Authorization", format!("Bearer {}", token))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/");

        let response = server
            .get("/view")
            .add_header("Authorization", format!("Bearer {}", token))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");
    }
}

// ============================================================
// Single feedback view
// ============================================================

mod single_feedback {
    use super::*;

    #[tokio::test]
    async fn returns_the_entry_by_id() {
        let server = setup_with_admin();

        let entry: FeedbackEntry = server
            .post("/feedback")
            .form(&json!({ "name": "Ada", "company": "Acme", "feedback": "Great!" }))
            .await
            .json();

        let token = login(&server).await;
        let response = server
            .get(&format!("/view/{}", entry.id))
            .add_header("Authorization", format!("Bearer {}", token))
            .await;

        response.assert_status_ok();
        let fetched: FeedbackEntry = response.json();
        assert_eq!(fetched.id, entry.id);
        assert_eq!(fetched.message, "Great!");
    }

    #[tokio::test]
    async fn unknown_ids_redirect_to_the_board() {
        let server = setup_with_admin();
        let token = login(&server).await;

        let response = server
            .get(&format!("/view/{}", uuid::Uuid::new_v4()))
            .add_header("Authorization", format!("Bearer {}", token))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/view");
    }

    #[tokio::test]
    async fn malformed_ids_redirect_to_the_board() {
        let server = setup_with_admin();
        let token = login(&server).await;

        let response = server
            .get("/view/not-a-uuid")
            .add_header("Authorization", format!("Bearer {}", token))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/view");
    }
}

// ============================================================
// Deletion
// ============================================================

mod deletion {
    use super::*;

    #[tokio::test]
    async fn requires_a_session() {
        let server = setup_with_admin();

        let entry: FeedbackEntry = server
            .post("/feedback")
            .form(&json!({ "name": "Ada", "company": "Acme", "feedback": "keep me" }))
            .await
            .json();

        let response = server
            .post("/delete")
            .form(&json!({ "delete": entry.id.to_string() }))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");

        let token = login(&server).await;
        let board = board(&server, &token).await;
        assert_eq!(board.feedback.len(), 1);
    }

    #[tokio::test]
    async fn removes_exactly_the_requested_feedback() {
        let server = setup_with_admin();

        let mut ids = Vec::new();
        for i in 1..=3 {
            let entry: FeedbackEntry = server
                .post("/feedback")
                .form(&json!({ "name": format!("Visitor {}", i), "company": "", "feedback": "hi" }))
                .await
                .json();
            ids.push(entry.id);
        }

        let token = login(&server).await;
        let response = server
            .post("/delete")
            .add_header("Authorization", format!("Bearer {}", token))
            .form(&json!({ "delete": ids[1].to_string() }))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/view");

        let board = board(&server, &token).await;
        let remaining: Vec<_> = board.feedback.iter().map(|f| f.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2]]);
    }

    #[tokio::test]
    async fn removes_a_survey_by_id() {
        let server = setup_with_admin();

        let entry: SurveyEntry = server
            .post("/survey")
            .form(&survey_form("good", "good", "good"))
            .await
            .json();

        let token = login(&server).await;
        server
            .post("/delete")
            .add_header("Authorization", format!("Bearer {}", token))
            .form(&json!({ "surveyDelete": entry.id.to_string() }))
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let board = board(&server, &token).await;
        assert!(board.surveys.is_empty());
    }

    #[tokio::test]
    async fn unknown_ids_are_a_silent_no_op() {
        let server = setup_with_admin();

        server
            .post("/feedback")
            .form(&json!({ "name": "Ada", "company": "Acme", "feedback": "hi" }))
            .await;

        let token = login(&server).await;
        let response = server
            .post("/delete")
            .add_header("Authorization", format!("Bearer {}", token))
            .form(&json!({ "delete": uuid::Uuid::new_v4().to_string() }))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);

        let board = board(&server, &token).await;
        assert_eq!(board.feedback.len(), 1);
    }

    #[tokio::test]
    async fn feedback_id_takes_precedence_when_both_are_present() {
        let server = setup_with_admin();

        let feedback: FeedbackEntry = server
            .post("/feedback")
            .form(&json!({ "name": "Ada", "company": "Acme", "feedback": "hi" }))
            .await
            .json();
        let survey: SurveyEntry = server
            .post("/survey")
            .form(&survey_form("good", "good", "good"))
            .await
            .json();

        let token = login(&server).await;
        server
            .post("/delete")
            .add_header("Authorization", format!("Bearer {}", token))
            .form(&json!({
                "delete": feedback.id.to_string(),
                "surveyDelete": survey.id.to_string(),
            }))
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let board = board(&server, &token).await;
        assert!(board.feedback.is_empty());
        assert_eq!(board.surveys.len(), 1);
    }

    #[tokio::test]
    async fn empty_requests_mutate_nothing() {
        let server = setup_with_admin();

        server
            .post("/feedback")
            .form(&json!({ "name": "Ada", "company": "Acme", "feedback": "hi" }))
            .await;

        let token = login(&server).await;
        let response = server
            .post("/delete")
            .add_header("Authorization", format!("Bearer {}", token))
            .form(&json!({}))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/view");

        let board = board(&server, &token).await;
        assert_eq!(board.feedback.len(), 1);
    }

    #[tokio::test]
    async fn get_redirects_to_the_board() {
        let server = setup_with_admin();
        let token = login(&server).await;

        let response = server
            .get("/delete")
            .add_header("Authorization", format!("Bearer {}", token))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/view");
    }
}

// ============================================================
// Concurrency
// ============================================================

mod concurrency {
    use super::*;

    #[tokio::test]
    async fn simultaneous_submissions_both_land() {
        let server = setup_with_admin();

        let (first, second) = tokio::join!(
            async {
                server
                    .post("/feedback")
                    .form(&json!({ "name": "First", "company": "", "feedback": "one" }))
                    .await
            },
            async {
                server
                    .post("/feedback")
                    .form(&json!({ "name": "Second", "company": "", "feedback": "two" }))
                    .await
            }
        );
        first.assert_status(StatusCode::CREATED);
        second.assert_status(StatusCode::CREATED);

        let token = login(&server).await;
        let board = board(&server, &token).await;
        assert_eq!(board.feedback.len(), 2);
    }
}
