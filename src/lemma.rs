/// Reduces an inflected word to its base form.
///
/// Tries verb forms before noun plurals; adjectives are never reduced, so
/// `better` stays `better`. Hyphenated tokens pass through unchanged.
pub fn reduce(input: &str) -> String {
    let mut word = input.trim().to_lowercase();
    if word.is_empty() || word.contains('-') {
        return word;
    }

    // Single steps can chain (founded -> found -> find); iterate so callers
    // always get a fixed point.
    for _ in 0..4 {
        let next = reduce_once(&word);
        if next == word {
            break;
        }
        word = next;
    }
    word
}

fn reduce_once(word: &str) -> String {
    if NON_INFLECTED.contains(&word) {
        return word.to_string();
    }
    if let Some(base) = irregular_verb(word) {
        return base.to_string();
    }
    if let Some(base) = irregular_noun(word) {
        return base.to_string();
    }
    if let Some(stem) = gerund_stem(word) {
        return stem;
    }
    if let Some(stem) = past_stem(word) {
        return stem;
    }
    if let Some(stem) = plural_stem(word) {
        return stem;
    }
    word.to_string()
}

// Surface forms that look inflected but are not.
const NON_INFLECTED: &[&str] = &[
    "always",
    "anything",
    "chaos",
    "cunning",
    "during",
    "evening",
    "everything",
    "hundred",
    "lens",
    "morning",
    "naked",
    "news",
    "nothing",
    "perhaps",
    "sacred",
    "series",
    "something",
    "species",
    "wicked",
];

fn irregular_verb(word: &str) -> Option<&'static str> {
    let base = match word {
        "added" | "adding" => "add",
        "am" | "is" | "are" | "was" | "were" | "been" | "being" => "be",
        "became" | "becoming" => "become",
        "began" | "begun" => "begin",
        "believed" | "believing" => "believe",
        "broke" | "broken" => "break",
        "brought" => "bring",
        "bought" => "buy",
        "caught" => "catch",
        "changed" | "changing" => "change",
        "chose" | "chosen" | "choosing" => "choose",
        "closed" | "closing" => "close",
        "came" | "coming" => "come",
        "cared" | "caring" => "care",
        "created" | "creating" => "create",
        "decided" | "deciding" => "decide",
        "described" | "describing" => "describe",
        "did" | "done" | "doing" => "do",
        "died" | "dying" => "die",
        "drew" | "drawn" => "draw",
        "drove" | "driven" | "driving" => "drive",
        "ate" | "eaten" => "eat",
        "fell" | "fallen" => "fall",
        "felt" => "feel",
        "fought" => "fight",
        "found" => "find",
        "flew" | "flown" => "fly",
        "forgot" | "forgotten" => "forget",
        "got" | "gotten" => "get",
        "gave" | "given" | "giving" => "give",
        "went" | "gone" | "going" => "go",
        "grew" | "grown" => "grow",
        "has" | "had" | "having" => "have",
        "heard" => "hear",
        "held" => "hold",
        "hoped" | "hoping" => "hope",
        "kept" => "keep",
        "knew" | "known" => "know",
        "led" => "lead",
        "left" | "leaving" => "leave",
        "lied" | "lying" => "lie",
        "lived" | "living" => "live",
        "lost" | "losing" => "lose",
        "loved" | "loving" => "love",
        "made" | "making" => "make",
        "meant" => "mean",
        "met" => "meet",
        "moved" | "moving" => "move",
        "named" | "naming" => "name",
        "noted" | "noting" => "note",
        "paid" => "pay",
        "provided" | "providing" => "provide",
        "raised" | "raising" => "raise",
        "ran" => "run",
        "received" | "receiving" => "receive",
        "rose" | "risen" | "rising" => "rise",
        "said" => "say",
        "sat" => "sit",
        "saved" | "saving" => "save",
        "saw" | "seen" => "see",
        "sold" => "sell",
        "sent" => "send",
        "served" | "serving" => "serve",
        "shared" | "sharing" => "share",
        "sang" | "sung" => "sing",
        "slept" => "sleep",
        "smiled" | "smiling" => "smile",
        "solved" | "solving" => "solve",
        "sought" => "seek",
        "spoke" | "spoken" => "speak",
        "spent" => "spend",
        "stood" => "stand",
        "stole" | "stolen" => "steal",
        "swam" | "swum" => "swim",
        "taught" => "teach",
        "took" | "taken" | "taking" => "take",
        "threw" | "thrown" => "throw",
        "thought" => "think",
        "told" => "tell",
        "tying" => "tie",
        "understood" => "understand",
        "used" | "using" => "use",
        "won" => "win",
        "wore" | "worn" => "wear",
        "wrote" | "written" | "writing" => "write",
        _ => return None,
    };
    Some(base)
}

fn irregular_noun(word: &str) -> Option<&'static str> {
    let base = match word {
        "analyses" => "analysis",
        "appendices" => "appendix",
        "children" => "child",
        "criteria" => "criterion",
        "crises" => "crisis",
        "feet" => "foot",
        "geese" => "goose",
        "halves" => "half",
        "indices" => "index",
        "knives" => "knife",
        "loaves" => "loaf",
        "matrices" => "matrix",
        "men" => "man",
        "mice" => "mouse",
        "oxen" => "ox",
        "phenomena" => "phenomenon",
        "shelves" => "shelf",
        "shoes" => "shoe",
        "teeth" => "tooth",
        "theses" => "thesis",
        "toes" => "toe",
        "wives" => "wife",
        "wolves" => "wolf",
        "women" => "woman",
        _ => return None,
    };
    Some(base)
}

fn gerund_stem(word: &str) -> Option<String> {
    let stem = word.strip_suffix("ing")?;
    if stem.chars().count() < 3 || !has_vowel(stem) {
        return None;
    }
    Some(respell_stem(stem))
}

fn past_stem(word: &str) -> Option<String> {
    if let Some(stem) = word.strip_suffix("ied") {
        if stem.chars().count() >= 2 {
            return Some(format!("{stem}y"));
        }
    }
    if word.ends_with("eed") {
        return None;
    }
    let stem = word.strip_suffix("ed")?;
    if stem.chars().count() < 3 || !has_vowel(stem) {
        return None;
    }
    Some(respell_stem(stem))
}

fn plural_stem(word: &str) -> Option<String> {
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().count() >= 2 {
            return Some(format!("{stem}y"));
        }
    }
    for suffix in ["ches", "shes", "sses", "xes", "zes", "oes"] {
        if word.ends_with(suffix) {
            let stem = word.strip_suffix("es")?;
            if stem.chars().count() >= 2 {
                return Some(stem.to_string());
            }
        }
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return None;
    }
    let stem = word.strip_suffix('s')?;
    if stem.chars().count() < 3 || !has_vowel(stem) {
        return None;
    }
    Some(stem.to_string())
}

// A stripped stem was respelled when the suffix went on: either its final
// consonant was doubled (stopp) or its silent e was dropped (bak). At most
// one of the two happened, so an undoubled stem never takes an e.
fn respell_stem(stem: &str) -> String {
    let undoubled = undouble(stem);
    if undoubled != stem {
        return undoubled;
    }
    restore_e(stem)
}

// stopp -> stop, but tell, miss, stuff, buzz keep their doubled letter.
fn undouble(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() >= 4 {
        let last = chars[chars.len() - 1];
        let prev = chars[chars.len() - 2];
        if last == prev && !is_vowel(last) && !matches!(last, 'l' | 's' | 'f' | 'z') {
            return chars[..chars.len() - 1].iter().collect();
        }
    }
    stem.to_string()
}

// bak -> bake, danc -> dance, argu -> argue. Callers guarantee at least
// three characters.
fn restore_e(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    let last = chars[n - 1];

    let needs_e = matches!(last, 'c' | 'v' | 'u')
        || (last == 'z' && is_vowel(chars[n - 2]))
        || stem.ends_with("dg")
        || stem.ends_with("rg")
        // A lone final consonant on a one-syllable stem means the verb was
        // e-final; hopped keeps its doubled p and never reaches this arm.
        || (n == 3
            && !is_vowel(chars[0])
            && is_vowel(chars[1])
            && !is_vowel(chars[2])
            && !matches!(last, 'w' | 'x' | 'y' | 's'));

    if needs_e {
        format!("{stem}e")
    } else {
        stem.to_string()
    }
}

fn has_vowel(stem: &str) -> bool {
    stem.chars().any(is_vowel)
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}
