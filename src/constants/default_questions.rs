use crate::models::domain::{Choice, LocalizedText, MediaItem, MediaType, Question};

const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x400.png";
const SMALL_PLACEHOLDER_IMAGE: &str = "https://placehold.co/300x200.png";
const ROAR_AUDIO: &str = "https://interactive-examples.mdn.mozilla.net/media/cc0-audio/t-rex-roar.mp3";
const FLOWER_VIDEO: &str = "https://interactive-examples.mdn.mozilla.net/media/cc0-videos/flower.mp4";

fn text(en: &str, tr: &str) -> LocalizedText {
    LocalizedText::from([("en".to_string(), en.to_string()), ("tr".to_string(), tr.to_string())])
}

fn media(media_type: MediaType, url: &str, alt: (&str, &str), hint: Option<&str>) -> MediaItem {
    MediaItem {
        media_type,
        url: url.to_string(),
        alt_text: Some(text(alt.0, alt.1)),
        data_ai_hint: hint.map(str::to_string),
    }
}

fn choice(id: &str, label: (&str, &str), media: Vec<MediaItem>) -> Choice {
    Choice {
        id: id.to_string(),
        text: text(label.0, label.1),
        media,
    }
}

/// Questions written into an empty collection on first listing, in display order.
pub fn default_questions() -> Vec<Question> {
    vec![
        Question {
            id: "q1".to_string(),
            text: text("What is the capital of Turkey?", "Türkiye'nin başkenti neresidir?"),
            choices: vec![
                choice(
                    "q1c1",
                    ("Istanbul", "İstanbul"),
                    vec![media(
                        MediaType::Image,
                        PLACEHOLDER_IMAGE,
                        ("Image of Istanbul", "İstanbul resmi"),
                        Some("Istanbul cityscape"),
                    )],
                ),
                choice(
                    "q1c2",
                    ("Ankara", "Ankara"),
                    vec![media(
                        MediaType::Image,
                        PLACEHOLDER_IMAGE,
                        ("Image of Ankara", "Ankara resmi"),
                        Some("Ankara monument"),
                    )],
                ),
                choice(
                    "q1c3",
                    ("Izmir", "İzmir"),
                    vec![media(MediaType::Audio, ROAR_AUDIO, ("Audio: Roar", "Ses: Kükreme"), None)],
                ),
            ],
        },
        Question {
            id: "q2".to_string(),
            text: text("Which of these is a primary color?", "Hangisi ana renktir?"),
            choices: vec![
                choice(
                    "q2c1",
                    ("Green", "Yeşil"),
                    vec![media(
                        MediaType::Video,
                        FLOWER_VIDEO,
                        ("Video: Flower blooming", "Video: Çiçek açması"),
                        None,
                    )],
                ),
                choice("q2c2", ("Orange", "Turuncu"), vec![]),
                choice(
                    "q2c3",
                    ("Red", "Kırmızı"),
                    vec![media(
                        MediaType::Image,
                        PLACEHOLDER_IMAGE,
                        ("Red color splash", "Kırmızı renk sıçraması"),
                        Some("red abstract"),
                    )],
                ),
            ],
        },
        Question {
            id: "q3".to_string(),
            text: text("What is 2 + 2?", "2 + 2 kaç eder?"),
            choices: vec![
                choice("q3c1", ("3", "3"), vec![]),
                choice(
                    "q3c2",
                    ("4", "4"),
                    vec![media(
                        MediaType::Image,
                        SMALL_PLACEHOLDER_IMAGE,
                        ("Number four", "Dört rakamı"),
                        Some("number four"),
                    )],
                ),
                choice("q3c3", ("5", "5"), vec![]),
            ],
        },
    ]
}
