// tests/form_controller.rs
//
// The product form controller's lifecycle through the real handlers: create
// mode opens an empty draft, edit mode seeds the draft from the fetched
// record, and the dialog's feature / category round trips mutate the stored
// draft.

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

use seller_dashboard::draft::DraftMode;
use seller_dashboard::handlers::{
    FeaturePayload, NewCategoryPayload, RemoveFeaturePayload, add_category_handler,
    add_feature_handler, open_create_form_handler, open_edit_form_handler,
    remove_feature_handler,
};
use seller_dashboard::state::{AppState, CommerceConfig};

async fn spawn_stub(app: Router) -> AppState {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    AppState::new(CommerceConfig {
        base_url: format!("http://{}/api", addr),
    })
}

/// The handlers mint the draft id internally; tests recover it from the
/// store, which holds exactly one draft in each scenario here.
async fn single_draft_id(state: &AppState) -> Uuid {
    state.drafts.run_pending_tasks().await;
    let (id, _) = state.drafts.iter().next().expect("a draft should be open");
    *id
}

#[tokio::test]
async fn create_form_opens_an_empty_draft() {
    let state = spawn_stub(Router::new()).await;

    let markup = open_create_form_handler(State(state.clone())).await;
    assert!(markup.into_string().contains("Add New Product"));

    let draft_id = single_draft_id(&state).await;
    let draft = state.drafts.get(&draft_id).await.unwrap();
    assert_eq!(*draft.mode(), DraftMode::Create);
    assert_eq!(draft.name, "");
    assert!(draft.features.is_empty());
    assert!(draft.images.is_empty());
}

#[tokio::test]
async fn edit_form_seeds_the_draft_from_the_fetched_record() {
    let app = Router::new().route(
        "/api/products/{id}",
        get(|Path(id): Path<String>| async move {
            Json(json!({
                "_id": id,
                "name": "Desk",
                "features": ["oak", "adjustable"],
                "images": ["https://cdn.test/desk.jpg"]
            }))
        }),
    );
    let state = spawn_stub(app).await;

    let markup = open_edit_form_handler(State(state.clone()), Path("p1".to_string()))
        .await
        .unwrap();
    assert!(markup.into_string().contains("Edit Product"));

    let draft_id = single_draft_id(&state).await;
    let draft = state.drafts.get(&draft_id).await.unwrap();
    assert_eq!(*draft.mode(), DraftMode::Edit("p1".to_string()));
    assert_eq!(draft.name, "Desk");
    assert_eq!(draft.features, vec!["oak", "adjustable"]);
    assert_eq!(draft.images.len(), 1);
    // Fields the response omitted fall back to empty defaults.
    assert_eq!(draft.sku, "");
    assert_eq!(draft.price, None);
    assert_eq!(draft.status, None);
}

#[tokio::test]
async fn feature_round_trip_mutates_the_stored_draft() {
    let state = spawn_stub(Router::new()).await;
    open_create_form_handler(State(state.clone())).await;
    let draft_id = single_draft_id(&state).await;

    // Blank after trimming: ignored.
    add_feature_handler(
        State(state.clone()),
        Path(draft_id),
        Form(FeaturePayload {
            feature: "   ".to_string(),
        }),
    )
    .await
    .unwrap();
    assert!(state.drafts.get(&draft_id).await.unwrap().features.is_empty());

    add_feature_handler(
        State(state.clone()),
        Path(draft_id),
        Form(FeaturePayload {
            feature: "waterproof".to_string(),
        }),
    )
    .await
    .unwrap();
    add_feature_handler(
        State(state.clone()),
        Path(draft_id),
        Form(FeaturePayload {
            feature: "waterproof".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(
        state.drafts.get(&draft_id).await.unwrap().features,
        vec!["waterproof", "waterproof"]
    );

    // Removal drops exactly one of the duplicates.
    remove_feature_handler(
        State(state.clone()),
        Path(draft_id),
        Form(RemoveFeaturePayload {
            value: "waterproof".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(
        state.drafts.get(&draft_id).await.unwrap().features,
        vec!["waterproof"]
    );
}

#[tokio::test]
async fn ad_hoc_category_lands_in_the_shared_set_once() {
    let state = spawn_stub(Router::new()).await;
    open_create_form_handler(State(state.clone())).await;
    let draft_id = single_draft_id(&state).await;

    for _ in 0..2 {
        add_category_handler(
            State(state.clone()),
            Path(draft_id),
            Form(NewCategoryPayload {
                new_category: "Outdoor".to_string(),
            }),
        )
        .await
        .unwrap();
    }

    assert_eq!(*state.categories.read().await, vec!["Outdoor".to_string()]);
    assert_eq!(state.drafts.get(&draft_id).await.unwrap().category, "Outdoor");

    // A blank name changes nothing.
    add_category_handler(
        State(state.clone()),
        Path(draft_id),
        Form(NewCategoryPayload {
            new_category: "  ".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(state.categories.read().await.len(), 1);
}
