//! The publications table and its rendering for the home page.

use crate::html::{el, text, Node};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Author {
    pub name: &'static str,
    pub href: &'static str,
}

const fn author(name: &'static str, href: &'static str) -> Author {
    Author { name, href }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Venue {
    pub name: &'static str,
    pub href: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Preprint,
    Conference,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Publication {
    pub title: &'static str,
    pub href: &'static str,
    pub venue: Venue,
    pub authors: Vec<Author>,
    pub year: u16,
    pub category: Category,
}

const DANIEL_PROL: Author = author("Daniel Prol", "/");
const AMIN_ALIPOUR: Author = author("Amin Alipour", "https://www.aminalipour.com/");
const JAMES_PRATHER: Author = author("James Prather", "https://jamesprather.com/");
const PAUL_DENNY: Author = author("Paul Denny", "https://www.cs.auckland.ac.nz/~paul/");
const JUHO_LEINONEN: Author = author("Juho Leinonen", "https://juholeinonen.com/");
const AAYUSH_KUMAR: Author = author(
    "Aayush Kumar",
    "https://www.linkedin.com/in/aayush-kumar-05a990213/",
);
const SRUTI_RAGAVAN: Author = author(
    "Sruti Srinivasa Ragavan",
    "https://sruti-s-ragavan.github.io/",
);
const DAYE_NAM: Author = author("Daye Nam", "https://dayenam.com/");
const MICHAEL_HILTON: Author = author("Michael Hilton", "https://www.cs.cmu.edu/~mhilton/");
const ALI_ALFAGEEH: Author = author(
    "Ali Alfageeh",
    "https://www.linkedin.com/in/ali-alfageeh-182755132/",
);
const MAHDI_KAZEMI: Author = author(
    "Mahdi Kazemi",
    "https://www.linkedin.com/in/sadegh-almahdi-kazemi/",
);
const MATIN_AMOOZADEH: Author = author("Matin Amoozadeh", "https://www.matinamoozadeh.com/");
const SOUTI_CHATTOPADHYAY: Author = author(
    "Souti Chattopadhyay",
    "https://viterbi.usc.edu/directory/faculty/Chattopadhyay/Souti",
);

const ARXIV: Venue = Venue {
    name: "arXiv Preprint",
    href: "https://arxiv.org/",
};

/// The publications in display order.
pub fn publications() -> Vec<Publication> {
    vec![
        Publication {
            title: "To Google or To ChatGPT? A Comparison of CS2 Students Information \
                    Gathering Approaches and Outcomes",
            href: "https://arxiv.org/abs/2501.11935",
            venue: ARXIV,
            authors: vec![AAYUSH_KUMAR, DANIEL_PROL, AMIN_ALIPOUR, SRUTI_RAGAVAN],
            year: 2025,
            category: Category::Preprint,
        },
        Publication {
            title: "From prompts to propositions: A logic-based lens on student-llm interactions",
            href: "https://arxiv.org/abs/2504.18691",
            venue: ARXIV,
            authors: vec![
                ALI_ALFAGEEH,
                MAHDI_KAZEMI,
                DAYE_NAM,
                DANIEL_PROL,
                MATIN_AMOOZADEH,
                SOUTI_CHATTOPADHYAY,
                JAMES_PRATHER,
                PAUL_DENNY,
                JUHO_LEINONEN,
                MICHAEL_HILTON,
                SRUTI_RAGAVAN,
                AMIN_ALIPOUR,
            ],
            year: 2025,
            category: Category::Preprint,
        },
        Publication {
            title: "Student-AI Interaction: A Case Study of CS1 students",
            href: "https://dl.acm.org/doi/abs/10.1145/3699538.3699567",
            venue: Venue {
                name: "Koli Calling 2024",
                href: "https://www.kolicalling.fi/",
            },
            authors: vec![
                DAYE_NAM,
                DANIEL_PROL,
                JAMES_PRATHER,
                MICHAEL_HILTON,
                SRUTI_RAGAVAN,
                AMIN_ALIPOUR,
            ],
            year: 2024,
            category: Category::Conference,
        },
    ]
}

/// Joins items the way an author list reads: `A`, `A and B`, or
/// `A, B, and C`. `text` produces the separator items. Returns `None` for an
/// empty list.
pub fn conjoin<T>(mut items: Vec<T>, text: impl Fn(&'static str) -> T) -> Option<Vec<T>> {
    let last = items.pop()?;
    let mut out = Vec::with_capacity(items.len() * 2 + 2);
    match items.len() {
        0 => {}
        1 => {
            out.extend(items);
            out.push(text(" and "));
        }
        _ => {
            for item in items {
                out.push(item);
                out.push(text(", "));
            }
            out.push(text("and "));
        }
    }
    out.push(last);
    Some(out)
}

/// Renders an author list as links joined with [`conjoin`].
pub fn authors(publication: &Publication) -> Result<Node> {
    let links = publication
        .authors
        .iter()
        .map(|a| el("a").attr("href", a.href).text(a.name).into())
        .collect();
    conjoin(links, text)
        .map(Node::Fragment)
        .ok_or(Error::NoAuthors {
            title: publication.title,
        })
}

/// Renders the publications list for the home page.
pub fn render(publications: &[Publication]) -> Result<Node> {
    let mut entries = Vec::with_capacity(publications.len());
    for publication in publications {
        entries.push(
            el("div")
                .child(el("div").child(el("a").attr("href", publication.href).text(publication.title)))
                .child(
                    el("div")
                        .class("pub-info")
                        .child(authors(publication)?)
                        .text(". ")
                        .child(
                            el("a")
                                .class("venue")
                                .attr("href", publication.venue.href)
                                .text(publication.venue.name),
                        )
                        .text(format!(" ({}).", publication.year)),
                ),
        );
    }
    Ok(el("div").class("publications").children(entries).into())
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a malformed publication entry.
#[derive(Debug)]
pub enum Error {
    /// Returned when a publication cites no authors.
    NoAuthors { title: &'static str },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NoAuthors { title } => write!(f, "no authors for publication `{}`", title),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(names: &[&str]) -> Option<String> {
        conjoin(names.iter().map(|s| s.to_string()).collect(), String::from)
            .map(|parts| parts.concat())
    }

    #[test]
    fn test_conjoin() {
        assert_eq!(Some("A".to_owned()), join(&["A"]));
        assert_eq!(Some("A and B".to_owned()), join(&["A", "B"]));
        assert_eq!(Some("A, B, and C".to_owned()), join(&["A", "B", "C"]));
        assert_eq!(Some("A, B, C, and D".to_owned()), join(&["A", "B", "C", "D"]));
        assert_eq!(None, join(&[]));
    }

    #[test]
    fn test_authors_render_as_links() -> Result<()> {
        let publication = Publication {
            authors: vec![DANIEL_PROL, AMIN_ALIPOUR],
            ..publications().remove(0)
        };
        assert_eq!(
            r#"<a href="/">Daniel Prol</a> and <a href="https://www.aminalipour.com/">Amin Alipour</a>"#,
            authors(&publication)?.render().as_str()
        );
        Ok(())
    }

    #[test]
    fn test_no_authors_is_an_error() {
        let publication = Publication {
            authors: Vec::new(),
            ..publications().remove(0)
        };
        assert!(matches!(authors(&publication), Err(Error::NoAuthors { .. })));
        assert!(render(&[publication]).is_err());
    }

    #[test]
    fn test_render_publication() -> Result<()> {
        let html = render(&publications()[2..])?.render();
        assert!(html.as_str().starts_with(r#"<div class="publications"><div><div><a href="https://dl.acm.org/doi/abs/10.1145/3699538.3699567">"#));
        assert!(html.as_str().contains(r#"<a href="https://www.aminalipour.com/">Amin Alipour</a>. <a class="venue" href="https://www.kolicalling.fi/">Koli Calling 2024</a> (2024).</div>"#));
        Ok(())
    }
}
