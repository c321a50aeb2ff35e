//! Prompt rendering for each request category.
//!
//! The backend sees only a flat prompt string; these templates are where a
//! request's context turns into one. Kept deliberately terse — the prompts
//! ask for a single short line in the character's voice, since anything
//! longer gets clipped by the front end anyway.

use crate::types::{Category, ContextValue, GenerationRequest, RequestContext};

fn field<'a>(context: &'a RequestContext, key: &str) -> &'a ContextValue {
    static EMPTY: ContextValue = ContextValue::Str(String::new());
    context.get(key).unwrap_or(&EMPTY)
}

pub(crate) fn render(request: &GenerationRequest) -> String {
    let ctx = &request.context;
    match request.category {
        Category::ActionCommentary => format!(
            "{subject} is about to {action}. {subject} is feeling {mood}. \
             Write one short line of playful commentary in {subject}'s voice.",
            subject = field(ctx, "subject"),
            action = field(ctx, "action"),
            mood = field(ctx, "mood"),
        ),
        Category::CharacterDialogue => format!(
            "{subject} is feeling {mood} and wants to talk about {topic}. \
             Write one line of dialogue in {subject}'s voice.",
            subject = field(ctx, "subject"),
            mood = field(ctx, "mood"),
            topic = field(ctx, "topic"),
        ),
        Category::SpecialEvent => format!(
            "Something rare just happened to {subject}: {event}. \
             Write one excited line reacting to it in {subject}'s voice.",
            subject = field(ctx, "subject"),
            event = field(ctx, "event"),
        ),
        Category::FreeformChat => format!(
            "{subject} is chatting with their keeper ({phase} of the conversation, \
             {history} messages so far). The keeper said: \"{message}\". \
             Reply briefly in {subject}'s voice.",
            subject = field(ctx, "subject"),
            phase = field(ctx, "phase"),
            history = field(ctx, "history_len"),
            message = field(ctx, "message"),
        ),
    }
}
