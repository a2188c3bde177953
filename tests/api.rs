use rematch::{
    source::{CharBuffer, CharSource, StreamSource},
    ErrorKind, Match, MatchError, Pattern, Span, Syntax,
};

use crate::Result;

fn spans(re: &Pattern, text: &str) -> Vec<(usize, usize)> {
    re.find_iter(text).map(|m| (m.start(), m.end())).collect()
}

#[test]
fn greedy_and_lazy_star() -> Result<()> {
    let greedy = Pattern::new("a*")?;
    let caps = greedy.find("aaab").unwrap();
    assert_eq!(Match::new(0..3), caps.get_match());
    assert_eq!(Some("aaa"), caps.as_str(0));

    let lazy = Pattern::new("a*?")?;
    let caps = lazy.find("aaab").unwrap();
    assert_eq!(Match::new(0..0), caps.get_match());
    assert_eq!(Some(""), caps.as_str(0));
    Ok(())
}

#[test]
fn optional_group_is_unset() -> Result<()> {
    let re = Pattern::new("(a)(b)?")?;
    let caps = re.find("a").unwrap();
    assert_eq!(3, caps.group_len());
    assert_eq!(Some(Span { start: 0, end: 1 }), caps.get(1));
    assert_eq!(Some("a"), caps.as_str(1));
    assert_eq!(None, caps.get(2));
    assert_eq!(None, caps.as_str(2));
    // Out of range groups behave like unset ones.
    assert_eq!(None, caps.get(3));
    Ok(())
}

#[test]
fn alternation_prefers_earlier_branches() -> Result<()> {
    let re = Pattern::new("(a|ab)(c|bcd)(d*)")?;
    let caps = re.find("abcd").unwrap();
    assert_eq!(Match::new(0..4), caps.get_match());
    assert_eq!(Some("a"), caps.as_str(1));
    assert_eq!(Some("bcd"), caps.as_str(2));
    assert_eq!(Some(""), caps.as_str(3));
    assert_eq!(Some(Span { start: 4, end: 4 }), caps.get(3));
    Ok(())
}

#[test]
fn inverted_interval_is_rejected() {
    for &syntax in &[
        Syntax::perl5(),
        Syntax::posix_extended(),
        Syntax::posix_egrep(),
    ] {
        let err = Pattern::builder().syntax(syntax).build("a{3,1}").unwrap_err();
        assert_eq!(&ErrorKind::InvertedRepetition { min: 3, max: 1 }, err.kind());
        assert_eq!(1, err.offset());
        assert_eq!("a{3,1}", err.pattern());
    }
    let err = Pattern::builder()
        .syntax(Syntax::posix_basic())
        .build(r"a\{3,1\}")
        .unwrap_err();
    assert_eq!(&ErrorKind::InvertedRepetition { min: 3, max: 1 }, err.kind());
}

#[test]
fn compile_errors_report_offsets() {
    let err = Pattern::new("ab(cd").unwrap_err();
    assert_eq!(&ErrorKind::UnclosedGroup, err.kind());
    assert_eq!(2, err.offset());
    assert!(err.to_string().starts_with("regex parse error at offset 2"));

    let err = Pattern::new("x[ab").unwrap_err();
    assert_eq!(&ErrorKind::UnclosedClass, err.kind());
    assert_eq!(1, err.offset());

    let err = Pattern::new("*a").unwrap_err();
    assert_eq!(&ErrorKind::NothingToRepeat, err.kind());
    assert_eq!(0, err.offset());

    let err = Pattern::new(r"ab\").unwrap_err();
    assert_eq!(&ErrorKind::TrailingBackslash, err.kind());
}

#[test]
fn builder_applies_syntax_and_config() -> Result<()> {
    let re = Pattern::builder()
        .syntax(Syntax::posix_basic())
        .configure(Pattern::config().case_insensitive(true))
        .build(r"\(ab\)\{2\}")?;
    assert_eq!(Syntax::posix_basic(), re.syntax());
    assert!(re.get_config().get_case_insensitive());
    assert_eq!(2, re.group_len());
    assert_eq!(4, re.min_len());
    let caps = re.find("xAbaBy").unwrap();
    assert_eq!(Match::new(1..5), caps.get_match());
    assert_eq!(Some("aB"), caps.as_str(1));

    // Later configurations only replace the options they set.
    let mut builder = Pattern::builder();
    builder
        .configure(Pattern::config().multi_line(true))
        .configure(Pattern::config().not_eol(true));
    let re = builder.build("a$")?;
    assert!(re.get_config().get_multi_line());
    assert_eq!(vec![(0, 1)], spans(&re, "a\na"));
    Ok(())
}

#[test]
fn find_at_and_iteration() -> Result<()> {
    let re = Pattern::new(r"\d+")?;
    assert_eq!(vec![(1, 3), (4, 5), (6, 9)], spans(&re, "a12b3c456"));

    let caps = re.find_at("a12b3c456", 2).unwrap();
    assert_eq!(Match::new(2..3), caps.get_match());
    assert!(re.find_at("a12b3c456", 9).is_none());
    assert!(re.find_at("a12b3c456", 100).is_none());

    let mut it = re.find_iter("1 2");
    assert_eq!(Some(Match::new(0..1)), it.next());
    assert_eq!(Some(Match::new(2..3)), it.next());
    assert_eq!(None, it.next());
    assert_eq!(None, it.next());
    it.reset();
    assert_eq!(Some(Match::new(0..1)), it.next());

    let re = Pattern::new(r"(\w)(\d)?")?;
    let got: Vec<Option<&str>> = re
        .captures_iter("a1b")
        .map(|caps| caps.as_str(2).map(|_| "digit"))
        .collect();
    assert_eq!(vec![Some("digit"), None], got);
    Ok(())
}

#[test]
fn offsets_are_characters() -> Result<()> {
    let re = Pattern::new("b+")?;
    let text = "ééébbé";
    let caps = re.find(text).unwrap();
    assert_eq!(Match::new(3..5), caps.get_match());
    assert_eq!("bb", caps.get_match().as_str(text));
    assert_eq!("éééXé", re.substitute(text, "X"));
    Ok(())
}

#[test]
fn substitute_first_and_all() -> Result<()> {
    let re = Pattern::new(r"(\w+)=(\w+)")?;
    let text = "a=1, b=2";
    assert_eq!("1=a, b=2", re.substitute(text, "$2=$1"));
    assert_eq!("1=a, 2=b", re.substitute_all(text, "$2=$1"));
    assert_eq!(text, re.substitute_all(text, "$0"));
    assert_eq!("nothing", re.substitute("nothing", "$1"));
    Ok(())
}

#[test]
fn full_match_needs_whole_text() -> Result<()> {
    let re = Pattern::new("a|ab")?;
    assert!(re.matches("ab"));
    assert!(re.matches("a"));
    assert!(!re.matches("abc"));
    assert!(!re.matches(""));
    assert!(Pattern::new("")?.matches(""));
    Ok(())
}

#[test]
fn search_over_stream() -> Result<()> {
    let re = Pattern::new("b+")?;
    let mut src = StreamSource::new("aabbbcbd".as_bytes());
    let caps = re.search(&mut src).unwrap();
    assert_eq!(Match::new(2..5), caps.get_match());
    assert_eq!(Some("bbb"), caps.as_str(0));
    // The cursor is left at the start of the match.
    assert_eq!(2, src.position());

    src.advance(caps.get_match().len());
    let caps = re.search(&mut src).unwrap();
    assert_eq!(Match::new(6..7), caps.get_match());
    src.advance(1);
    assert!(re.search(&mut src).is_none());
    assert!(src.take_error().is_none());
    Ok(())
}

#[test]
fn match_here_is_anchored() -> Result<()> {
    let re = Pattern::new("b")?;
    let mut chars = CharBuffer::from("abc");
    assert!(re.match_here(&mut chars).is_none());
    assert_eq!(0, chars.position());
    chars.set_position(1);
    let caps = re.match_here(&mut chars).unwrap();
    assert_eq!(Match::new(1..2), caps.get_match());
    assert_eq!(1, chars.position());
    Ok(())
}

#[test]
fn step_limit_errors() -> Result<()> {
    let re = Pattern::builder()
        .configure(Pattern::config().step_limit(Some(500)))
        .build("(a*)*b")?;
    let text = "a".repeat(25);
    let err = re.try_find_at(&text, 0).unwrap_err();
    assert_eq!(MatchError::StepLimitExceeded { limit: 500 }, err);
    assert!(err.to_string().contains("500"));
    assert!(re.try_matches(&text).is_err());
    let got = re.try_find_at("b", 0)?.map(|caps| caps.get_match());
    assert_eq!(Some(Match::new(0..1)), got);
    Ok(())
}

#[test]
fn syntax_names() {
    assert_eq!(Ok(Syntax::posix_extended()), "posix-extended".parse());
    assert_eq!(Ok(Syntax::emacs()), "EMACS".parse());
    let err = "perl6".parse::<Syntax>().unwrap_err();
    assert!(err.to_string().contains("perl6"));
}

#[test]
fn patterns_are_shareable() -> Result<()> {
    let re = Pattern::new(r"\w+")?;
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let re = re.clone();
            std::thread::spawn(move || {
                let text = format!("word{} x", i);
                re.find(&text).map(|caps| caps.get_match().len())
            })
        })
        .collect();
    for h in handles {
        assert_eq!(Some(5), h.join().unwrap());
    }
    Ok(())
}
