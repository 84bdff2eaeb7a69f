//! Controller for the four-step prompt wizard.
//!
//! The wizard owns one [`WizardState`] for the lifetime of a browser session.
//! Forward progress is gated per step, the final step carries either the
//! generated prompt or the error that replaced it, and follow-up edits reuse
//! the conversation id handed out by the chat API.

pub mod client;
pub mod options;

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use crate::web::models::{FormData, GenerationRequest, DEFAULT_QUERY, DEFAULT_SLIDE_COUNT};
use client::GenerateApi;

pub const MIN_SLIDES: u32 = 1;
pub const MAX_SLIDES: u32 = 50;

const MODIFY_INSTRUCTION: &str = "以下の指示に基づいて、プロンプトを修正してください。";

/// What the last generation or modification produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Generated { prompt: String },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Theme,
    Audience,
    Design,
    Result(Outcome),
}

impl Step {
    pub fn index(&self) -> usize {
        match self {
            Step::Theme => 0,
            Step::Audience => 1,
            Step::Design => 2,
            Step::Result(_) => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        options::STEP_TITLES[self.index()]
    }
}

/// Text fields editable through [`Wizard::set_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    SlideTheme,
    Audience,
    Purpose,
    KeyMessage,
    DesignStyle,
    Tone,
    FontStyle,
    MainColor,
    SubColor,
}

/// The "ask for changes" panel shown under a generated prompt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Modification {
    pub open: bool,
    pub request: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WizardState {
    pub step: Step,
    pub form: FormData,
    pub conversation_id: String,
    pub modification: Modification,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("step {0} is not complete")]
    Incomplete(usize),
    #[error("cannot move {direction} from step {step}")]
    InvalidTransition { direction: &'static str, step: usize },
    #[error("no generated prompt to modify")]
    NothingToModify,
    #[error("modification request is empty")]
    EmptyModification,
}

pub struct Wizard<A> {
    state: WizardState,
    api: A,
}

impl<A: GenerateApi> Wizard<A> {
    pub fn new(api: A) -> Self {
        Self {
            state: WizardState::default(),
            api,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> &Step {
        &self.state.step
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        let form = &mut self.state.form;
        let slot = match field {
            TextField::SlideTheme => &mut form.slide_theme,
            TextField::Audience => &mut form.audience,
            TextField::Purpose => &mut form.purpose,
            TextField::KeyMessage => &mut form.key_message,
            TextField::DesignStyle => &mut form.design_style,
            TextField::Tone => &mut form.tone,
            TextField::FontStyle => &mut form.font_style,
            TextField::MainColor => &mut form.main_color,
            TextField::SubColor => &mut form.sub_color,
        };
        *slot = value.into();
    }

    /// Accepts the raw number-input text. Anything that is not a positive
    /// integer falls back to the default count.
    pub fn set_slide_count(&mut self, raw: &str) {
        let count = match raw.trim().parse::<u32>() {
            Ok(0) | Err(_) => DEFAULT_SLIDE_COUNT,
            Ok(n) => n,
        };
        self.state.form.slide_count = count.clamp(MIN_SLIDES, MAX_SLIDES);
    }

    /// Whether the current step has everything it needs to move on.
    pub fn is_step_complete(&self) -> bool {
        let f = &self.state.form;
        match self.state.step {
            Step::Theme => !f.slide_theme.is_empty(),
            Step::Audience => {
                !f.audience.is_empty() && !f.purpose.is_empty() && !f.key_message.is_empty()
            }
            Step::Design => {
                !f.design_style.is_empty()
                    && !f.tone.is_empty()
                    && !f.main_color.is_empty()
                    && !f.sub_color.is_empty()
            }
            Step::Result(_) => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.state.step, Step::Audience | Step::Design)
    }

    /// Moves from theme to audience, or audience to design. Leaving the
    /// design step happens through [`Wizard::generate_prompt`].
    pub fn advance(&mut self) -> Result<(), WizardError> {
        let index = self.state.step.index();
        let next = match self.state.step {
            Step::Theme => Step::Audience,
            Step::Audience => Step::Design,
            Step::Design | Step::Result(_) => {
                return Err(WizardError::InvalidTransition {
                    direction: "forward",
                    step: index,
                })
            }
        };
        if !self.is_step_complete() {
            return Err(WizardError::Incomplete(index));
        }
        debug!("Wizard step {} -> {}", index, next.index());
        self.state.step = next;
        Ok(())
    }

    pub fn go_back(&mut self) -> Result<(), WizardError> {
        let previous = match self.state.step {
            Step::Audience => Step::Theme,
            Step::Design => Step::Audience,
            Step::Theme | Step::Result(_) => {
                return Err(WizardError::InvalidTransition {
                    direction: "back",
                    step: self.state.step.index(),
                })
            }
        };
        self.state.step = previous;
        Ok(())
    }

    pub fn preview(&self) -> Option<&'static str> {
        options::preview_image(&self.state.form.design_style, &self.state.form.tone)
    }

    /// Submits the completed form as a fresh conversation.
    pub async fn generate_prompt(&mut self) -> Result<(), WizardError> {
        if self.state.step != Step::Design {
            return Err(WizardError::InvalidTransition {
                direction: "forward",
                step: self.state.step.index(),
            });
        }
        if !self.is_step_complete() {
            return Err(WizardError::Incomplete(self.state.step.index()));
        }

        info!("Generating prompt for '{}'", self.state.form.slide_theme);
        let request = GenerationRequest {
            form: self.state.form.clone(),
            query: DEFAULT_QUERY.to_string(),
            conversation_id: None,
        };
        self.submit(request).await;
        Ok(())
    }

    pub fn open_modification(&mut self) -> Result<(), WizardError> {
        if !matches!(self.state.step, Step::Result(Outcome::Generated { .. })) {
            return Err(WizardError::NothingToModify);
        }
        self.state.modification.open = true;
        Ok(())
    }

    pub fn set_modification_request(&mut self, request: impl Into<String>) {
        self.state.modification.request = request.into();
    }

    pub fn cancel_modification(&mut self) {
        self.state.modification = Modification::default();
    }

    /// Sends the modification request as a follow-up in the current
    /// conversation. The panel closes and clears whatever the outcome.
    pub async fn modify_prompt(&mut self) -> Result<(), WizardError> {
        if !self.state.modification.open {
            return Err(WizardError::NothingToModify);
        }
        if self.state.modification.request.trim().is_empty() {
            return Err(WizardError::EmptyModification);
        }

        let request = GenerationRequest {
            form: self.state.form.clone(),
            query: format!("{}\n\n{}", MODIFY_INSTRUCTION, self.state.modification.request),
            conversation_id: Some(self.state.conversation_id.clone()),
        };
        info!("Requesting prompt modification");
        self.submit(request).await;
        self.state.modification = Modification::default();
        Ok(())
    }

    /// From an error screen, returns to the first step with the form intact.
    pub fn return_to_input(&mut self) -> Result<(), WizardError> {
        if !matches!(self.state.step, Step::Result(Outcome::Failed { .. })) {
            return Err(WizardError::InvalidTransition {
                direction: "back",
                step: self.state.step.index(),
            });
        }
        self.state.step = Step::Theme;
        Ok(())
    }

    pub fn reset_all(&mut self) {
        self.state = WizardState::default();
    }

    /// The prompt ready to be copied, if the last request succeeded.
    pub fn copyable_prompt(&self) -> Option<&str> {
        match &self.state.step {
            Step::Result(Outcome::Generated { prompt }) if !prompt.is_empty() => Some(prompt),
            _ => None,
        }
    }

    async fn submit(&mut self, request: GenerationRequest) {
        let outcome = match self.api.generate(&request).await {
            Ok(result) => {
                if let Some(id) = result.conversation_id.filter(|id| !id.is_empty()) {
                    self.state.conversation_id = id;
                }
                Outcome::Generated {
                    prompt: result.answer,
                }
            }
            Err(message) => Outcome::Failed { message },
        };
        self.state.step = Step::Result(outcome);
    }
}
