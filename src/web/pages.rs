//! Server-rendered wizard. Every button posts the visible fields to one of the
//! `/wizard/*` routes, the action runs against the shared [`Wizard`], and the
//! browser is redirected back to `/` to see the new step.

use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::web::models::FormData;
use crate::wizard::client::GenerateApi;
use crate::wizard::options::{COLOR_OPTIONS, DESIGN_STYLES, FONT_OPTIONS, STEP_TITLES, TONES};
use crate::wizard::{Modification, Outcome, Step, TextField, Wizard, WizardError};
use crate::AppState;

type SessionWizard = Wizard<Arc<dyn GenerateApi>>;

const BUSY_MESSAGE: &str = "A request is already in progress. Please wait.";

/// Fields posted by the first three steps. Only the inputs of the visible
/// step are present; everything absent keeps its current value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepFields {
    slide_theme: Option<String>,
    slide_count: Option<String>,
    audience: Option<String>,
    purpose: Option<String>,
    key_message: Option<String>,
    design_style: Option<String>,
    tone: Option<String>,
    font_style: Option<String>,
    main_color: Option<String>,
    sub_color: Option<String>,
}

impl StepFields {
    fn apply(self, wizard: &mut SessionWizard) {
        let text = [
            (TextField::SlideTheme, self.slide_theme),
            (TextField::Audience, self.audience),
            (TextField::Purpose, self.purpose),
            (TextField::KeyMessage, self.key_message),
            (TextField::DesignStyle, self.design_style),
            (TextField::Tone, self.tone),
            (TextField::FontStyle, self.font_style),
            (TextField::MainColor, self.main_color),
            (TextField::SubColor, self.sub_color),
        ];
        for (field, value) in text {
            if let Some(value) = value {
                wizard.set_text(field, value);
            }
        }
        if let Some(count) = self.slide_count {
            wizard.set_slide_count(&count);
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ModifyFields {
    request: String,
}

#[derive(Serialize)]
struct PageView<'a> {
    step: usize,
    steps: [&'static str; 4],
    form: &'a FormData,
    can_go_back: bool,
    preview: Option<&'static str>,
    prompt: Option<&'a str>,
    error: Option<&'a str>,
    modification: &'a Modification,
    notice: Option<String>,
}

fn render(
    tera: &Tera,
    wizard: &SessionWizard,
    notice: Option<String>,
    status: StatusCode,
) -> HttpResponse {
    let state = wizard.state();
    let (prompt, error) = match &state.step {
        Step::Result(Outcome::Generated { prompt }) => (Some(prompt.as_str()), None),
        Step::Result(Outcome::Failed { message }) => (None, Some(message.as_str())),
        _ => (None, None),
    };
    let view = PageView {
        step: state.step.index(),
        steps: STEP_TITLES,
        form: &state.form,
        can_go_back: wizard.can_go_back(),
        preview: wizard.preview(),
        prompt,
        error,
        modification: &state.modification,
        notice,
    };

    let rendered = Context::from_serialize(&view).and_then(|mut context| {
        context.insert("design_styles", &DESIGN_STYLES);
        context.insert("tones", &TONES);
        context.insert("fonts", &FONT_OPTIONS);
        context.insert("colors", &COLOR_OPTIONS);
        tera.render("index.html", &context)
    });
    match rendered {
        Ok(html) => HttpResponse::build(status).content_type("text/html").body(html),
        Err(e) => {
            error!("Template error: {}", e);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

fn busy() -> HttpResponse {
    warn!("Wizard action rejected while a request is in flight");
    HttpResponse::Conflict()
        .content_type("text/plain; charset=utf-8")
        .body(BUSY_MESSAGE)
}

/// Post/redirect/get on success; a rejected transition re-renders the page
/// with the reason.
fn finish(tera: &Tera, wizard: &SessionWizard, result: Result<(), WizardError>) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/"))
            .finish(),
        Err(e) => {
            warn!("Wizard action rejected: {}", e);
            render(tera, wizard, Some(e.to_string()), StatusCode::BAD_REQUEST)
        }
    }
}

// Index page handler
pub async fn index(data: web::Data<AppState>) -> HttpResponse {
    match data.wizard.try_lock() {
        Ok(wizard) => render(&data.tera, &wizard, None, StatusCode::OK),
        Err(_) => busy(),
    }
}

pub async fn advance(data: web::Data<AppState>, fields: web::Form<StepFields>) -> HttpResponse {
    let Ok(mut wizard) = data.wizard.try_lock() else {
        return busy();
    };
    fields.into_inner().apply(&mut wizard);
    let result = wizard.advance();
    finish(&data.tera, &wizard, result)
}

pub async fn go_back(data: web::Data<AppState>, fields: web::Form<StepFields>) -> HttpResponse {
    let Ok(mut wizard) = data.wizard.try_lock() else {
        return busy();
    };
    fields.into_inner().apply(&mut wizard);
    let result = wizard.go_back();
    finish(&data.tera, &wizard, result)
}

pub async fn generate_prompt(
    data: web::Data<AppState>,
    fields: web::Form<StepFields>,
) -> HttpResponse {
    let Ok(mut wizard) = data.wizard.try_lock() else {
        return busy();
    };
    fields.into_inner().apply(&mut wizard);
    let result = wizard.generate_prompt().await;
    finish(&data.tera, &wizard, result)
}

pub async fn open_modification(data: web::Data<AppState>) -> HttpResponse {
    let Ok(mut wizard) = data.wizard.try_lock() else {
        return busy();
    };
    let result = wizard.open_modification();
    finish(&data.tera, &wizard, result)
}

pub async fn cancel_modification(data: web::Data<AppState>) -> HttpResponse {
    let Ok(mut wizard) = data.wizard.try_lock() else {
        return busy();
    };
    wizard.cancel_modification();
    finish(&data.tera, &wizard, Ok(()))
}

pub async fn modify_prompt(
    data: web::Data<AppState>,
    fields: web::Form<ModifyFields>,
) -> HttpResponse {
    let Ok(mut wizard) = data.wizard.try_lock() else {
        return busy();
    };
    wizard.set_modification_request(fields.into_inner().request);
    let result = wizard.modify_prompt().await;
    finish(&data.tera, &wizard, result)
}

pub async fn return_to_input(data: web::Data<AppState>) -> HttpResponse {
    let Ok(mut wizard) = data.wizard.try_lock() else {
        return busy();
    };
    let result = wizard.return_to_input();
    finish(&data.tera, &wizard, result)
}

pub async fn reset(data: web::Data<AppState>) -> HttpResponse {
    let Ok(mut wizard) = data.wizard.try_lock() else {
        return busy();
    };
    wizard.reset_all();
    finish(&data.tera, &wizard, Ok(()))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::web::Bytes;
    use actix_web::{test, web, App};

    use crate::test_support::{answer, app_state, configured, Canned, RecordingBackend, ScriptedApi};
    use crate::web::routes;
    use crate::wizard::{Outcome, Step, WizardState};
    use crate::AppState;

    fn shared(api: ScriptedApi) -> web::Data<AppState> {
        web::Data::new(app_state(
            configured(),
            RecordingBackend::new(Canned::Reply(200, "{}")),
            api,
        ))
    }

    fn form_post(uri: &str, form: &[(&str, &str)]) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .set_form(form.to_vec())
    }

    fn index() -> test::TestRequest {
        test::TestRequest::get().uri("/")
    }

    fn text(body: Bytes) -> String {
        String::from_utf8(body.to_vec()).unwrap()
    }

    fn design_fields() -> Vec<(&'static str, &'static str)> {
        vec![
            ("designStyle", "モダン"),
            ("tone", "エレガント"),
            ("fontStyle", "遊ゴシック"),
            ("mainColor", "#9333ea"),
            ("subColor", "#c4b5fd"),
        ]
    }

    #[actix_web::test]
    async fn index_renders_first_step() {
        let data = shared(ScriptedApi::default());
        let app = test::init_service(App::new().app_data(data.clone()).configure(routes::configure)).await;

        let html = text(test::call_and_read_body(&app, index().to_request()).await);
        assert!(html.contains("name=\"slideTheme\""));
        assert!(html.contains("formaction=\"/wizard/next\""));
        assert!(!html.contains("name=\"audience\""));
    }

    #[actix_web::test]
    async fn incomplete_step_is_rerendered_with_reason() {
        let data = shared(ScriptedApi::default());
        let app = test::init_service(App::new().app_data(data.clone()).configure(routes::configure)).await;

        let req = form_post("/wizard/next", &[("slideTheme", ""), ("slideCount", "10")]).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let html = text(test::read_body(resp).await);
        assert!(html.contains("step 0 is not complete"));
        assert_eq!(data.wizard.lock().await.step(), &Step::Theme);
    }

    #[actix_web::test]
    async fn full_flow_generates_modifies_and_resets() {
        let api = ScriptedApi::default()
            .reply(answer("最初のプロンプト", Some("conv-5")))
            .reply(answer("修正後のプロンプト", Some("conv-5")));
        let data = shared(api.clone());
        let app = test::init_service(App::new().app_data(data.clone()).configure(routes::configure)).await;

        let req = form_post("/wizard/next", &[("slideTheme", "四半期報告"), ("slideCount", "15")]);
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let html = text(test::call_and_read_body(&app, index().to_request()).await);
        assert!(html.contains("name=\"audience\""));

        let req = form_post(
            "/wizard/next",
            &[("audience", "経営陣"), ("purpose", "予算承認"), ("keyMessage", "黒字化")],
        );
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let req = form_post("/wizard/generate", &design_fields());
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let html = text(test::call_and_read_body(&app, index().to_request()).await);
        assert!(html.contains("最初のプロンプト"));
        assert!(!html.contains("formaction=\"/wizard/back\""));

        let resp = test::call_service(&app, form_post("/wizard/modification/open", &[]).to_request()).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let req = form_post("/wizard/modify", &[("request", "箇条書きを減らして")]);
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let html = text(test::call_and_read_body(&app, index().to_request()).await);
        assert!(html.contains("修正後のプロンプト"));

        let sent = api.requests();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].form.slide_count, 15);
        assert_eq!(sent[0].form.design_style, "モダン");
        assert_eq!(sent[1].conversation_id.as_deref(), Some("conv-5"));

        let resp = test::call_service(&app, form_post("/wizard/reset", &[]).to_request()).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(data.wizard.lock().await.state(), &WizardState::default());
    }

    #[actix_web::test]
    async fn failure_is_shown_and_return_keeps_the_form() {
        let api = ScriptedApi::default().reply(Err("upstream down".to_string()));
        let data = shared(api);
        let app = test::init_service(App::new().app_data(data.clone()).configure(routes::configure)).await;

        let steps = vec![
            form_post("/wizard/next", &[("slideTheme", "t")]),
            form_post("/wizard/next", &[("audience", "a"), ("purpose", "p"), ("keyMessage", "k")]),
            form_post("/wizard/generate", &design_fields()),
        ];
        for req in steps {
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        }

        assert_eq!(
            data.wizard.lock().await.step(),
            &Step::Result(Outcome::Failed {
                message: "upstream down".to_string()
            })
        );
        let html = text(test::call_and_read_body(&app, index().to_request()).await);
        assert!(html.contains("upstream down"));

        let resp = test::call_service(&app, form_post("/wizard/return", &[]).to_request()).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let wizard = data.wizard.lock().await;
        assert_eq!(wizard.step(), &Step::Theme);
        assert_eq!(wizard.state().form.slide_theme, "t");
    }

    #[actix_web::test]
    async fn actions_are_refused_while_a_request_is_in_flight() {
        let data = shared(ScriptedApi::default());
        let app = test::init_service(App::new().app_data(data.clone()).configure(routes::configure)).await;

        let _pending = data.wizard.lock().await;
        let resp = test::call_service(&app, form_post("/wizard/generate", &design_fields()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn back_keeps_edits_from_the_current_step() {
        let data = shared(ScriptedApi::default());
        let app = test::init_service(App::new().app_data(data.clone()).configure(routes::configure)).await;

        test::call_service(&app, form_post("/wizard/next", &[("slideTheme", "t")]).to_request()).await;
        let req = form_post("/wizard/back", &[("audience", "投資家")]);
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let wizard = data.wizard.lock().await;
        assert_eq!(wizard.step(), &Step::Theme);
        assert_eq!(wizard.state().form.audience, "投資家");
    }
}
