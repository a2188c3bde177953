use std::io::{self, Read};

use rematch::{Pattern, SubstitutionFilter, Syntax};

use crate::Result;

/// A reader that hands out its data in chunks of a fixed size, which puts
/// chunk boundaries in the middle of matches and of multi-byte characters.
struct Chunked<'a> {
    data: &'a [u8],
    size: usize,
}

impl<'a> io::Read for Chunked<'a> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.size.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

fn filter_chunked(
    re: &Pattern,
    text: &str,
    template: &str,
    size: usize,
) -> io::Result<String> {
    let rdr = Chunked { data: text.as_bytes(), size };
    let mut out = String::new();
    SubstitutionFilter::new(re, rdr, template).read_to_string(&mut out)?;
    Ok(out)
}

#[test]
fn chunk_boundaries_do_not_matter() -> Result<()> {
    let cases = &[
        (r"(\w+)@(\w+)", "to: joe@example, ann@host.", "$2:$1"),
        ("é+", "caféé crème brûlée", "E"),
        (r"\bthe\b", "the other theme, the end", "THE"),
        (r"(ab)\1", "ababxabab", "[$1]"),
        ("x*", "日本語", "-"),
        ("$", "line one\nline two", "."),
    ];
    for &(pattern, text, template) in cases {
        let re = Pattern::new(pattern)?;
        let want = re.substitute_all(text, template);
        for size in 1..=7 {
            let got = filter_chunked(&re, text, template, size)?;
            assert_eq!(want, got, "pattern {:?}, chunk size {}", pattern, size);
        }
    }
    Ok(())
}

#[test]
fn long_input() -> Result<()> {
    let re = Pattern::new("needle")?;
    let mut text = String::new();
    for i in 0..5_000 {
        text.push_str(if i % 97 == 0 { "needle " } else { "hay " });
    }
    let got = filter_chunked(&re, &text, "NEEDLE", 4096)?;
    assert_eq!(text.replace("needle", "NEEDLE"), got);
    Ok(())
}

#[test]
fn posix_dialect_in_stream() -> Result<()> {
    let re = Pattern::builder()
        .syntax(Syntax::posix_basic())
        .build(r"\([0-9]\{1,3\}\)\.")?;
    let got = filter_chunked(&re, "v1.22.333.4444", "<\\1>", 2)?;
    // Templates only know `$n`, so the backslash form is literal text.
    assert_eq!(
        "v<\\1><\\1><\\1>4444",
        got,
    );
    let got = filter_chunked(&re, "v1.22.333.4444", "<$1>", 2)?;
    assert_eq!("v<1><22><333>4444", got);
    Ok(())
}

#[test]
fn step_limit_agrees_with_substitute_all() -> Result<()> {
    let re = Pattern::builder()
        .configure(Pattern::config().step_limit(Some(20)))
        .build("[ab]c")?;
    let text = format!("{}ac{}bc", "x".repeat(30), "y".repeat(30));
    let want = re.try_substitute_all(&text, "<$0>")?;
    assert_eq!(want, filter_chunked(&re, &text, "<$0>", 3)?);
    Ok(())
}

#[test]
fn iterator_and_read_chars() -> Result<()> {
    let re = Pattern::new("b")?;
    let chars: io::Result<Vec<char>> =
        SubstitutionFilter::new(&re, "abc".as_bytes(), "BB").collect();
    assert_eq!(vec!['a', 'B', 'B', 'c'], chars?);

    let mut filter = SubstitutionFilter::new(&re, "abcb".as_bytes(), "");
    let mut buf = ['\0'; 8];
    let n = filter.read_chars(&mut buf)?;
    assert_eq!(&['a', 'c'], &buf[..n]);
    assert_eq!(0, filter.read_chars(&mut buf)?);
    assert!(std::ptr::eq(&re, filter.pattern()));
    Ok(())
}

#[test]
fn reader_errors_come_after_output() {
    struct Failing<'a>(&'a [u8]);

    impl<'a> io::Read for Failing<'a> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Err(io::Error::new(io::ErrorKind::Other, "boom"));
            }
            let n = buf.len().min(self.0.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    let re = Pattern::new("o").unwrap();
    let mut filter = SubstitutionFilter::new(&re, Failing(b"foo"), "0");
    let mut got = String::new();
    let err = loop {
        match filter.read_char() {
            Ok(Some(c)) => got.push(c),
            Ok(None) => panic!("expected an error"),
            Err(err) => break err,
        }
    };
    assert_eq!("f00", got);
    assert_eq!("boom", err.to_string());
    assert_eq!(None, filter.read_char().unwrap());
}
