//! Greeting rendering.
//!
//! `/` greets a stranger, `/{name}` greets the capitalized name.

/// Name used when the caller supplied none.
pub const STRANGER: &str = "stranger";

/// Titlecase forms that differ from `char::to_uppercase`.
///
/// Digraphs titlecase to their mixed form (`ǆ` -> `ǅ`), ligatures keep only
/// the first letter capital (`ß` -> `Ss`), and Greek letters with iota
/// subscript keep the subscript instead of expanding to a capital iota.
fn titlecase_special(c: char) -> Option<&'static str> {
    let s = match c {
        'Ǆ' | 'ǅ' | 'ǆ' => "ǅ",
        'Ǉ' | 'ǈ' | 'ǉ' => "ǈ",
        'Ǌ' | 'ǋ' | 'ǌ' => "ǋ",
        'Ǳ' | 'ǲ' | 'ǳ' => "ǲ",
        'ß' => "Ss",
        'ﬀ' => "Ff",
        'ﬁ' => "Fi",
        'ﬂ' => "Fl",
        'ﬃ' => "Ffi",
        'ﬄ' => "Ffl",
        'ﬅ' | 'ﬆ' => "St",
        'և' => "Եւ",
        'ﬓ' => "Մն",
        'ﬔ' => "Մե",
        'ﬕ' => "Մի",
        'ﬖ' => "Վն",
        'ﬗ' => "Մխ",
        '\u{1FB2}' => "\u{1FBA}\u{0345}",
        '\u{1FB4}' => "\u{0386}\u{0345}",
        '\u{1FB7}' => "\u{0391}\u{0342}\u{0345}",
        '\u{1FC2}' => "\u{1FCA}\u{0345}",
        '\u{1FC4}' => "\u{0389}\u{0345}",
        '\u{1FC7}' => "\u{0397}\u{0342}\u{0345}",
        '\u{1FF2}' => "\u{1FFA}\u{0345}",
        '\u{1FF4}' => "\u{038F}\u{0345}",
        '\u{1FF7}' => "\u{03A9}\u{0342}\u{0345}",
        _ => return None,
    };
    Some(s)
}

/// Single code point titlecase forms that differ from the uppercase.
///
/// Covers Greek letters with iota subscript and Georgian Mkhedruli, whose
/// titlecase is the letter itself while uppercase moves it to Mtavruli.
fn titlecase_single(c: char) -> Option<char> {
    let cp = c as u32;
    let mapped = match cp {
        0x10D0..=0x10FA | 0x10FD..=0x10FF => cp,
        0x1F80..=0x1F87 | 0x1F90..=0x1F97 | 0x1FA0..=0x1FA7 => cp + 8,
        0x1F88..=0x1F8F | 0x1F98..=0x1F9F | 0x1FA8..=0x1FAF => cp,
        0x1FB3 | 0x1FBC => 0x1FBC,
        0x1FC3 | 0x1FCC => 0x1FCC,
        0x1FF3 | 0x1FFC => 0x1FFC,
        _ => return None,
    };
    char::from_u32(mapped)
}

fn push_titlecase(c: char, out: &mut String) {
    if let Some(s) = titlecase_special(c) {
        out.push_str(s);
    } else if let Some(t) = titlecase_single(c) {
        out.push(t);
    } else {
        out.extend(c.to_uppercase());
    }
}

/// Titlecase the first character and lower-case the rest.
///
/// Characters without case are left as they are, and an empty input stays
/// empty.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let mut out = String::with_capacity(name.len());
            push_titlecase(first, &mut out);
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
    }
}

/// Render the HTML greeting. `None` greets the stranger.
pub fn greeting_html(name: Option<&str>) -> String {
    let who = match name {
        Some(n) => capitalize(n),
        None => STRANGER.to_string(),
    };
    format!("<h1>Hello, {who}!</h1>")
}
