use crate::models::domain::{Choice, LocalizedText, MediaItem, Question};

/// Produces the value that is actually written for `question`.
///
/// The caller's value is left untouched. Media without a usable url is
/// dropped, blank alt-text entries are removed (and the whole `alt_text`
/// when none remain), and a blank `data_ai_hint` is removed.
pub fn sanitize_question(question: &Question) -> Question {
    Question {
        id: question.id.clone(),
        text: question.text.clone(),
        choices: question.choices.iter().map(sanitize_choice).collect(),
    }
}

fn sanitize_choice(choice: &Choice) -> Choice {
    Choice {
        id: choice.id.clone(),
        text: choice.text.clone(),
        media: choice.media.iter().filter_map(sanitize_media).collect(),
    }
}

fn sanitize_media(item: &MediaItem) -> Option<MediaItem> {
    if item.url.trim().is_empty() {
        return None;
    }

    let alt_text = item
        .alt_text
        .as_ref()
        .map(non_blank_entries)
        .filter(|text| !text.is_empty());

    let data_ai_hint = item
        .data_ai_hint
        .as_ref()
        .filter(|hint| !hint.trim().is_empty())
        .cloned();

    Some(MediaItem {
        media_type: item.media_type,
        url: item.url.clone(),
        alt_text,
        data_ai_hint,
    })
}

fn non_blank_entries(text: &LocalizedText) -> LocalizedText {
    text.iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(lang, value)| (lang.clone(), value.clone()))
        .collect()
}
