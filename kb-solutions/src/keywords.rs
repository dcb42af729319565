//! Keyword extraction for Russian and English support text.

use kb_core::constants::MIN_KEYWORD_CHARS;
use kb_core::text::normalize;

const STOP_WORDS: &[&str] = &[
    // Russian
    "и", "в", "во", "не", "что", "он", "на", "я", "с", "со", "как", "а", "то", "все", "она",
    "так", "его", "но", "да", "ты", "к", "у", "же", "вы", "за", "бы", "по", "только", "ее",
    "мне", "было", "вот", "от", "меня", "еще", "нет", "о", "из", "ему", "теперь", "когда",
    "даже", "ну", "вдруг", "ли", "если", "уже", "или", "ни", "быть", "был", "него", "до",
    "вас", "нибудь", "опять", "уж", "вам", "ведь", "там", "потом", "себя", "ничего", "ей",
    "может", "они", "тут", "где", "есть", "надо", "ней", "для", "мы", "тебя", "их", "чем",
    "была", "сам", "чтоб", "без", "будто", "чего", "раз", "тоже", "себе", "под", "будет",
    "тогда", "кто", "этот", "того", "потому", "этого", "какой", "совсем", "ним", "здесь",
    "этом", "один", "почти", "мой", "тем", "чтобы", "нее", "сейчас", "были", "куда", "зачем",
    "всех", "никогда", "можно", "при", "наконец", "два", "об", "другой", "хоть", "после",
    "над", "больше", "тот", "через", "эти", "нас", "про", "всего", "них", "какая", "много",
    "разве", "три", "эту", "моя", "впрочем", "хорошо", "свою", "этой", "перед", "иногда",
    "лучше", "чуть", "том", "нельзя", "такой", "им", "более", "всегда", "конечно", "всю",
    "между", "это", "очень", "пожалуйста", "здравствуйте", "спасибо", "добрый", "день",
    "подскажите", "почему", "также", "наш", "наши", "нам", "вашей", "ваш",
    // English
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her",
    "was", "one", "our", "out", "has", "have", "him", "his", "how", "its", "may", "new",
    "now", "old", "see", "two", "way", "who", "did", "get", "got", "let", "put", "say",
    "she", "too", "use", "this", "that", "with", "from", "they", "will", "would", "there",
    "their", "what", "about", "which", "when", "make", "like", "just", "into", "than",
    "then", "them", "these", "some", "could", "other", "been", "were", "does", "doesnt",
    "dont", "didnt", "isnt", "arent", "wasnt", "wont", "cant", "please", "hello", "thanks",
    "thank", "why", "where", "your", "yours", "ours", "also", "very",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Lowercased, punctuation-free, de-duplicated keywords in first-occurrence
/// order. Words shorter than three characters and stop words are dropped;
/// at most `max` are returned.
pub fn extract_keywords(text: &str, max: usize) -> Vec<String> {
    let normalized = normalize(text);
    let mut out: Vec<String> = Vec::new();
    for word in normalized.split_whitespace() {
        if out.len() >= max {
            break;
        }
        if word.chars().count() < MIN_KEYWORD_CHARS || is_stop_word(word) {
            continue;
        }
        if !out.iter().any(|w| w == word) {
            out.push(word.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn russian_problem_text() {
        let kws = extract_keywords("Заказы не проходят, ошибка API", 20);
        assert_eq!(kws, vec!["заказы", "проходят", "ошибка", "api"]);
    }

    #[test]
    fn deduplicates_in_order() {
        let kws = extract_keywords("Payment payment PAYMENT failed, failed", 20);
        assert_eq!(kws, vec!["payment", "failed"]);
    }

    #[test]
    fn caps_at_max() {
        let text = (0..50).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        assert_eq!(extract_keywords(&text, 20).len(), 20);
    }

    #[test]
    fn drops_english_stop_words() {
        let kws = extract_keywords("Why does the invoice show the wrong amount?", 20);
        assert_eq!(kws, vec!["invoice", "show", "wrong", "amount"]);
    }

    #[test]
    fn contractions_are_single_stop_words() {
        let kws = extract_keywords("I don't get why checkout doesn't load", 20);
        assert_eq!(kws, vec!["checkout", "load"]);
    }
}
