/// Integration tests for the CrewDesk API
///
/// These tests exercise the full HTTP surface against a real database:
/// - Registration, login, and the session gate
/// - Employee and team CRUD with tenant isolation
/// - Assignment lifecycle including the duplicate conflict
/// - Audit trail contents, filtering, and pagination
///
/// They skip themselves unless TEST_DATABASE_URL is set.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use common::{bare_request, body_json, json_request, TestContext};
use crewdesk_shared::auth::jwt::{create_token, Claims};
use crewdesk_shared::models::audit_log::{AuditAction, AuditLog, NewAuditEntry};
use serde_json::json;
use tower::Service as _;
use uuid::Uuid;

/// Total matching audit entries for an action, as reported by the API
async fn action_total(ctx: &TestContext, action: &str) -> i64 {
    let request = bare_request("GET", &format!("/logs?action={}", action), &ctx.token);
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["total"].as_i64().unwrap()
}

/// Test the public health endpoint
#[tokio::test]
async fn test_health_check() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Server is running");

    ctx.cleanup().await.unwrap();
}

/// Test that registration leaves a session token and an audit entry behind
#[tokio::test]
async fn test_register_creates_audit_entry() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    // The context itself was registered through the endpoint
    assert_eq!(action_total(&ctx, "organisation_created").await, 1);

    let request = bare_request("GET", "/logs?action=organisation_created", &ctx.token);
    let response = ctx.app.clone().call(request).await.unwrap();
    let body = body_json(response).await;

    let entry = &body["logs"][0];
    assert_eq!(entry["action"], "organisation_created");
    assert_eq!(entry["organisationId"], ctx.organisation_id.to_string());
    assert_eq!(entry["meta"]["userId"], ctx.user_id.to_string());
    assert_eq!(entry["user"]["email"], ctx.email.as_str());

    ctx.cleanup().await.unwrap();
}

/// Test that a duplicate email is rejected without partial state
#[tokio::test]
async fn test_register_duplicate_email_conflict() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    let attempted_name = format!("Dup Org {}", Uuid::new_v4());
    let request = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "orgName": attempted_name,
                "adminName": "Someone Else",
                "email": ctx.email,
                "password": "different-password",
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["message"], "Email already registered");

    // The rejected organisation must not exist
    let (orgs,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM organisations WHERE name = $1")
        .bind(&attempted_name)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(orgs, 0);

    // And the email still maps to exactly one account
    let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&ctx.email)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(users, 1);

    ctx.cleanup().await.unwrap();
}

/// Test that registration validates its input
#[tokio::test]
async fn test_register_rejects_missing_and_empty_fields() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    // Missing fields fail body extraction
    let request = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Empty values fail validation with per-field details
    let request = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "orgName": "",
                "adminName": "Someone",
                "email": "someone@example.com",
                "password": "password123",
            })
            .to_string(),
        ))
        .unwrap();
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "org_name");

    ctx.cleanup().await.unwrap();
}

/// Test login with valid credentials
#[tokio::test]
async fn test_login_returns_token_and_audit_entry() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": ctx.email, "password": "password123" }).to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["id"], ctx.user_id.to_string());
    assert_eq!(body["organisation"]["id"], ctx.organisation_id.to_string());

    assert_eq!(action_total(&ctx, "user_login").await, 1);

    ctx.cleanup().await.unwrap();
}

/// Test that wrong-password and unknown-email logins look identical
#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    let wrong_password = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": ctx.email, "password": "wrong-password" }).to_string(),
        ))
        .unwrap();
    let response = ctx.app.clone().call(wrong_password).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_password_body = body_json(response).await;

    let unknown_email = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": format!("nobody-{}@example.com", Uuid::new_v4()),
                "password": "password123",
            })
            .to_string(),
        ))
        .unwrap();
    let response = ctx.app.clone().call(unknown_email).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let unknown_email_body = body_json(response).await;

    // Same status, same body; nothing reveals which emails exist
    assert_eq!(wrong_password_body, unknown_email_body);
    assert_eq!(wrong_password_body["message"], "Invalid credentials");

    // Failed logins don't reach the audit trail
    assert_eq!(action_total(&ctx, "user_login").await, 0);

    ctx.cleanup().await.unwrap();
}

/// Test the session gate on protected routes
#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    // No header at all
    let request = Request::builder()
        .method("GET")
        .uri("/employees")
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong scheme
    let request = Request::builder()
        .method("GET")
        .uri("/employees")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Garbage token
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", "/employees", "not-a-real-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

/// Test that an expired session is rejected
#[tokio::test]
async fn test_expired_token_rejected() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    let claims = Claims::with_expiration(ctx.user_id, ctx.organisation_id, Duration::hours(-1));
    let token = create_token(&claims, common::TEST_JWT_SECRET).unwrap();

    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", "/employees", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Token expired");

    ctx.cleanup().await.unwrap();
}

/// Test the full employee lifecycle and its audit trail
#[tokio::test]
async fn test_employee_crud_lifecycle() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    // Create
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/employees",
            &ctx.token,
            json!({
                "firstName": "John",
                "lastName": "Doe",
                "email": "john@example.com",
                "phone": "123-456-7890",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["employee"]["firstName"], "John");
    let employee_id = body["employee"]["id"].as_str().unwrap().to_string();
    let uri = format!("/employees/{}", employee_id);

    // Get includes an empty team list
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", &uri, &ctx.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["employee"]["lastName"], "Doe");
    assert!(body["employee"]["teams"].as_array().unwrap().is_empty());

    // List contains it
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", "/employees", &ctx.token))
        .await
        .unwrap();
    let body = body_json(response).await;
    let employees = body["employees"].as_array().unwrap();
    assert!(employees.iter().any(|e| e["id"] == employee_id.as_str()));

    // Update a name and clear the phone with an explicit null
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "PUT",
            &uri,
            &ctx.token,
            json!({ "firstName": "Johnny", "phone": null }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["employee"]["firstName"], "Johnny");
    assert_eq!(body["employee"]["lastName"], "Doe");
    assert!(body["employee"]["phone"].is_null());
    // Untouched field survives
    assert_eq!(body["employee"]["email"], "john@example.com");

    // Delete
    let response = ctx
        .app
        .clone()
        .call(bare_request("DELETE", &uri, &ctx.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Employee deleted successfully"
    );

    // Gone
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", &uri, &ctx.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // One audit entry per mutation
    assert_eq!(action_total(&ctx, "employee_created").await, 1);
    assert_eq!(action_total(&ctx, "employee_updated").await, 1);
    assert_eq!(action_total(&ctx, "employee_deleted").await, 1);

    // The update entry records only what was sent
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", "/logs?action=employee_updated", &ctx.token))
        .await
        .unwrap();
    let body = body_json(response).await;
    let changes = body["logs"][0]["meta"]["changes"].as_object().unwrap();
    assert_eq!(changes["firstName"], "Johnny");
    assert!(changes.contains_key("phone") && changes["phone"].is_null());
    assert!(!changes.contains_key("lastName"));

    ctx.cleanup().await.unwrap();
}

/// Test the name requirements on employee creation
#[tokio::test]
async fn test_employee_create_requires_names() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    // Missing lastName entirely
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/employees",
            &ctx.token,
            json!({ "firstName": "John" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Empty firstName
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/employees",
            &ctx.token,
            json!({ "firstName": "", "lastName": "Doe" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "first_name");

    // Rejected writes never reach the audit trail
    assert_eq!(action_total(&ctx, "employee_created").await, 0);

    ctx.cleanup().await.unwrap();
}

/// Test that one organisation cannot touch another's rows
#[tokio::test]
async fn test_tenant_isolation() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/employees",
            &ctx.token,
            json!({ "firstName": "Jane", "lastName": "Smith" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let employee_id = body_json(response).await["employee"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/employees/{}", employee_id);

    let (other_token, other_org) = ctx.register_second_org().await.unwrap();

    // The second organisation can't see, change, or delete the row
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", &uri, &other_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "PUT",
            &uri,
            &other_token,
            json!({ "firstName": "Hijacked" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .clone()
        .call(bare_request("DELETE", &uri, &other_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Its own list stays empty
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", "/employees", &other_token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["employees"].as_array().unwrap().is_empty());

    // The row is untouched for its owner
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", &uri, &ctx.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["employee"]["firstName"], "Jane");

    ctx.cleanup_org(other_org).await.unwrap();
    ctx.cleanup().await.unwrap();
}

/// Test the full team lifecycle and its audit trail
#[tokio::test]
async fn test_team_crud_lifecycle() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/teams",
            &ctx.token,
            json!({ "name": "Engineering", "description": "Software Engineering team" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["team"]["name"], "Engineering");
    let team_id = body["team"]["id"].as_str().unwrap().to_string();
    let uri = format!("/teams/{}", team_id);

    // Get includes an empty member list
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", &uri, &ctx.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["team"]["employees"].as_array().unwrap().is_empty());

    // Rename and clear the description with an explicit null
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "PUT",
            &uri,
            &ctx.token,
            json!({ "name": "Platform", "description": null }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["team"]["name"], "Platform");
    assert!(body["team"]["description"].is_null());

    // Empty name is rejected
    let response = ctx
        .app
        .clone()
        .call(json_request("PUT", &uri, &ctx.token, json!({ "name": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Delete
    let response = ctx
        .app
        .clone()
        .call(bare_request("DELETE", &uri, &ctx.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Team deleted successfully"
    );

    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", &uri, &ctx.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(action_total(&ctx, "team_created").await, 1);
    assert_eq!(action_total(&ctx, "team_updated").await, 1);
    assert_eq!(action_total(&ctx, "team_deleted").await, 1);

    ctx.cleanup().await.unwrap();
}

/// Test assign and unassign, including the duplicate conflict
#[tokio::test]
async fn test_assignment_lifecycle() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/employees",
            &ctx.token,
            json!({ "firstName": "John", "lastName": "Doe" }),
        ))
        .await
        .unwrap();
    let employee_id = body_json(response).await["employee"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/teams",
            &ctx.token,
            json!({ "name": "Eng" }),
        ))
        .await
        .unwrap();
    let team_id = body_json(response).await["team"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Assign
    let assign_uri = format!("/teams/{}/assign", team_id);
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            &assign_uri,
            &ctx.token,
            json!({ "employeeId": employee_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["assignment"]["employeeId"], employee_id.as_str());
    assert_eq!(body["assignment"]["teamId"], team_id.as_str());

    // The latest audit entry is the assignment
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", "/logs", &ctx.token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["logs"][0]["action"], "employee_assigned_to_team");
    assert_eq!(body["logs"][0]["meta"]["employeeId"], employee_id.as_str());
    assert_eq!(body["logs"][0]["meta"]["teamId"], team_id.as_str());

    // Team lists the member
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", &format!("/teams/{}", team_id), &ctx.token))
        .await
        .unwrap();
    let body = body_json(response).await;
    let members = body["team"]["employees"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["id"], employee_id.as_str());

    // And the employee lists the team
    let response = ctx
        .app
        .clone()
        .call(bare_request(
            "GET",
            &format!("/employees/{}", employee_id),
            &ctx.token,
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["employee"]["teams"][0]["id"], team_id.as_str());

    // Assigning again conflicts
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            &assign_uri,
            &ctx.token,
            json!({ "employeeId": employee_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["message"],
        "Employee already assigned to this team"
    );

    // Unassign
    let unassign_uri = format!("/teams/{}/unassign", team_id);
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            &unassign_uri,
            &ctx.token,
            json!({ "employeeId": employee_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Employee unassigned from team successfully"
    );

    // Unassigning again is a 404
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            &unassign_uri,
            &ctx.token,
            json!({ "employeeId": employee_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Assignment not found");

    // One entry per successful side; the conflict didn't log
    assert_eq!(action_total(&ctx, "employee_assigned_to_team").await, 1);
    assert_eq!(action_total(&ctx, "employee_unassigned_from_team").await, 1);

    ctx.cleanup().await.unwrap();
}

/// Test assignment against unknown targets
#[tokio::test]
async fn test_assign_unknown_targets() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/teams",
            &ctx.token,
            json!({ "name": "Eng" }),
        ))
        .await
        .unwrap();
    let team_id = body_json(response).await["team"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Unknown employee
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            &format!("/teams/{}/assign", team_id),
            &ctx.token,
            json!({ "employeeId": Uuid::new_v4() }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Employee not found");

    // Unknown team
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            &format!("/teams/{}/assign", Uuid::new_v4()),
            &ctx.token,
            json!({ "employeeId": Uuid::new_v4() }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Team not found");

    // Missing employee ID
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            &format!("/teams/{}/assign", team_id),
            &ctx.token,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    ctx.cleanup().await.unwrap();
}

/// Test that deleting an employee removes its assignments
#[tokio::test]
async fn test_delete_employee_removes_assignments() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/employees",
            &ctx.token,
            json!({ "firstName": "Bob", "lastName": "Johnson" }),
        ))
        .await
        .unwrap();
    let employee_id = body_json(response).await["employee"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/teams",
            &ctx.token,
            json!({ "name": "Marketing" }),
        ))
        .await
        .unwrap();
    let team_id = body_json(response).await["team"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            &format!("/teams/{}/assign", team_id),
            &ctx.token,
            json!({ "employeeId": employee_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .clone()
        .call(bare_request(
            "DELETE",
            &format!("/employees/{}", employee_id),
            &ctx.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The join rows went with it
    let (remaining,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM employee_teams WHERE employee_id = $1")
            .bind(employee_id.parse::<Uuid>().unwrap())
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    assert_eq!(remaining, 0);

    // The team survives with an empty member list
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", &format!("/teams/{}", team_id), &ctx.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["team"]["employees"]
        .as_array()
        .unwrap()
        .is_empty());

    ctx.cleanup().await.unwrap();
}

/// Test log pagination, the limit cap, and the action filter
#[tokio::test]
async fn test_logs_pagination_and_limit_cap() {
    let ctx = match TestContext::try_new().await.unwrap() {
        Some(ctx) => ctx,
        None => return,
    };

    // Seed 60 entries directly; registration already wrote one
    // organisation_created entry
    let mut tx = ctx.db.begin().await.unwrap();
    for sequence in 0..60 {
        AuditLog::append(
            &mut tx,
            NewAuditEntry {
                organisation_id: ctx.organisation_id,
                user_id: ctx.user_id,
                action: AuditAction::EmployeeCreated,
                meta: json!({ "sequence": sequence }),
            },
        )
        .await
        .unwrap();
    }
    tx.commit().await.unwrap();

    // First page
    let response = ctx
        .app
        .clone()
        .call(bare_request(
            "GET",
            "/logs?action=employee_created&limit=50&offset=0",
            &ctx.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["total"], 60);
    assert_eq!(first["limit"], 50);
    assert_eq!(first["offset"], 0);
    assert_eq!(first["logs"].as_array().unwrap().len(), 50);

    // Second page holds the remainder
    let response = ctx
        .app
        .clone()
        .call(bare_request(
            "GET",
            "/logs?action=employee_created&limit=50&offset=50",
            &ctx.token,
        ))
        .await
        .unwrap();
    let second = body_json(response).await;
    assert_eq!(second["total"], 60);
    assert_eq!(second["logs"].as_array().unwrap().len(), 10);

    // The two pages never overlap
    let mut ids: Vec<String> = first["logs"]
        .as_array()
        .unwrap()
        .iter()
        .chain(second["logs"].as_array().unwrap().iter())
        .map(|log| log["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 60);

    // Oversized limits are capped at 100
    let response = ctx
        .app
        .clone()
        .call(bare_request(
            "GET",
            "/logs?action=employee_created&limit=5000",
            &ctx.token,
        ))
        .await
        .unwrap();
    let capped = body_json(response).await;
    assert_eq!(capped["limit"], 100);
    assert_eq!(capped["logs"].as_array().unwrap().len(), 60);

    // Nonsense values fall back to sane ones
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", "/logs?limit=0&offset=-5", &ctx.token))
        .await
        .unwrap();
    let floor = body_json(response).await;
    assert_eq!(floor["limit"], 1);
    assert_eq!(floor["offset"], 0);
    assert_eq!(floor["logs"].as_array().unwrap().len(), 1);

    // Unfiltered view includes the registration entry
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", "/logs", &ctx.token))
        .await
        .unwrap();
    let unfiltered = body_json(response).await;
    assert_eq!(unfiltered["total"], 61);

    // A filter nothing matches returns an empty page
    let response = ctx
        .app
        .clone()
        .call(bare_request("GET", "/logs?action=team_deleted", &ctx.token))
        .await
        .unwrap();
    let empty = body_json(response).await;
    assert_eq!(empty["total"], 0);
    assert!(empty["logs"].as_array().unwrap().is_empty());

    ctx.cleanup().await.unwrap();
}
