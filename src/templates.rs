//! Composes full page documents: the home page and blog post pages.

use crate::html::{el, text, Document, Element, Markup, Node};
use crate::post::BlogPostEntry;

const AUTHOR: &str = "Daniel Prol";

const FONTS: &str = "https://fonts.googleapis.com/css2?family=Roboto+Mono:ital,wght@0,100..700;\
                     1,100..700&family=Roboto+Serif:ital,opsz,wght@0,8..144,100..900;\
                     1,8..144,100..900&display=swap";

const SCHOLAR: &str = "https://scholar.google.com/citations?hl=en&view_op=list_works&gmla=\
                       ANZ5fUOMurZyH0skWC2FvVythJGco0VwY0QH9tkZ0-R7dg2j5bQ8FLTwb4eRjDZqwWeCI4K1g0WM_\
                       MIN6ZarjA&user=mgKTgWcAAAAJ";

fn stylesheet(href: &str) -> Element {
    el("link").attr("rel", "stylesheet").attr("href", href)
}

/// The `<head>` children every page shares.
fn head() -> Vec<Node> {
    vec![
        el("meta").attr("charset", "utf-8").into(),
        el("link")
            .attr("rel", "icon")
            .attr("type", "image/png")
            .attr("href", "/icon.png")
            .into(),
        el("meta")
            .attr("name", "viewport")
            .attr("content", "width=device-width, initial-scale=1")
            .into(),
        el("link")
            .attr("rel", "preconnect")
            .attr("href", "https://fonts.googleapis.com")
            .into(),
        el("link")
            .attr("rel", "preconnect")
            .attr("href", "https://fonts.gstatic.com")
            .flag("crossorigin")
            .into(),
        stylesheet(FONTS).into(),
    ]
}

fn social(class: &str, href: &str) -> Node {
    el("a").class(class).attr("href", href).into()
}

/// A project card: title, year, and a one-paragraph description.
struct Project {
    title: &'static str,
    year: u16,
    href: &'static str,
    description: &'static str,
}

const PROJECTS: &[Project] = &[
    Project {
        title: "Buddy",
        year: 2025,
        href: "https://marketplace.visualstudio.com/items?itemName=dprol.buddy-ai",
        description: "Buddy is a VS Code extension that helps students better understand \
                      programming problems.",
    },
    Project {
        title: "Research Group Website",
        year: 2025,
        href: "https://uhcsed.web.app/",
        description: "Learn about who I work with and what we do in our research group.",
    },
    Project {
        title: "Catholic Podcasts Website",
        year: 2024,
        href: "https://evangelio.app/",
        description: "A curated selection of Spanish-language podcasts to bring Jesus into \
                      your daily routine.",
    },
    Project {
        title: "SaaS Product Chat",
        year: 2018,
        href: "https://www.youtube.com/playlist?list=PLnLzwYW6HOC6SJ4d66pMm8ZWjEmgIwwRp",
        description: "SaaS Product Chat was a Spanish-language video podcast covering \
                      software-as-a-service topics, featuring speakers from the Latin American \
                      and Spanish tech industry.",
    },
];

fn projects() -> Node {
    el("div")
        .class("stuff")
        .children(PROJECTS.iter().map(|p| {
            el("a")
                .attr("href", p.href)
                .child(
                    el("div")
                        .class("toy")
                        .child(el("h3").text(p.title))
                        .child(el("h3").class("year").text(p.year.to_string())),
                )
                .child(el("p").text(p.description))
        }))
        .into()
}

fn bio() -> Vec<Node> {
    vec![
        el("p")
            .text("Hi! ")
            .child(el("span").class("wave").text("👋"))
            .text(
                " I'm Daniel. I'm a first-year PhD student in CS at the University of Houston, \
                 advised by ",
            )
            .child(el("a").attr("href", "https://www.aminalipour.com/").text("Amin Alipour"))
            .text(". I do research in ")
            .child(el("span").class("topic").text("Computing Education"))
            .text(" (you can ")
            .child(
                el("a")
                    .attr("href", "https://computingeducationthings.substack.com/")
                    .text("follow me on Substack"),
            )
            .text(
                "!), with a particular focus on Programming Education, AI for Computing \
                 Education and Human-AI Interaction.",
            )
            .into(),
        el("p")
            .text(
                "Before that, I worked for 10 years in various industry positions (my LinkedIn \
                 profile has more details about the \"industry side\" of my life). I'm also \
                 passionate about outreach: blogs, podcasts, newsletters, social media, and \
                 teaching, of course.",
            )
            .into(),
    ]
}

/// Renders the blog index: one line per published post, in the given order.
pub fn blog_index(published: &[&BlogPostEntry]) -> Node {
    el("ul")
        .children(published.iter().map(|post| {
            el("li")
                .text(format!("{} ", post.display_date()))
                .child(
                    el("a")
                        .attr("href", post.href.map(str::to_owned).unwrap_or_else(|| post.path()))
                        .text(post.title),
                )
        }))
        .into()
}

/// Composes the home page around pre-rendered publications and blog index
/// fragments.
pub fn compose_home(publications: Node, blog_index: Node) -> Document {
    Document::new(
        el("html")
            .attr("lang", "en-us")
            .child(
                el("head")
                    .children(head())
                    .child(
                        stylesheet(
                            "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.7.1/css/all.min.css",
                        )
                        .attr(
                            "integrity",
                            "sha512-5Hs3dF2AEPkpNAR7UiOHba+lRSJNeM2ECkwxUIxC1Q/FLycGTbNapWXB4tP889k5T5Ju8fs4b1P5z/iB4nMfSQ==",
                        )
                        .attr("crossorigin", "anonymous")
                        .attr("referrerpolicy", "no-referrer"),
                    )
                    .child(stylesheet("/index.css"))
                    .child(el("title").text(AUTHOR)),
            )
            .child(
                el("body").child(
                    el("main")
                        .child(
                            el("div")
                                .class("me")
                                .child(
                                    el("img")
                                        .class("photo")
                                        .attr("src", "photo.jpg")
                                        .attr("width", "100")
                                        .attr("height", "100"),
                                )
                                .child(el("h1").class("name").text(AUTHOR)),
                        )
                        .child(
                            el("div")
                                .class("socials")
                                .child(social("fa fa-envelope fa-2x", "mailto:dprol@uh.edu"))
                                .child(social("fa-brands fa-github fa-2x", "https://github.com/dprol"))
                                .child(social(
                                    "fa-brands fa-linkedin fa-2x",
                                    "https://www.linkedin.com/in/dannyprol/",
                                ))
                                .child(social("fa-brands fa-google-scholar fa-2x", SCHOLAR))
                                .child(social("fa-brands fa-x-twitter fa-2x", "https://x.com/DannyProl"))
                                .child(social(
                                    "fa-brands fa-youtube fa-2x",
                                    "https://www.youtube.com/@ProlDaniel/videos",
                                )),
                        )
                        .children(bio())
                        .child(el("h2").text("Publications"))
                        .child(publications)
                        .child(el("h2").text("Projects"))
                        .child(el("p").text("Here are a few projects I've worked on over the years."))
                        .child(projects())
                        .child(el("h2").text("Blog"))
                        .child(blog_index),
                ),
            ),
    )
}

/// The inputs for a blog post page.
pub struct BlogPost<'a> {
    pub title: &'a str,

    /// The byline date, or `None` for an unpublished post.
    pub date: Option<String>,

    /// Whether the post ships its own `style.css`.
    pub has_style_override: bool,

    /// The rendered markdown body, injected without escaping.
    pub body: Markup,
}

/// Composes a blog post page.
pub fn compose_blog_post(post: BlogPost) -> Document {
    let mut head = el("head")
        .children(head())
        .child(stylesheet(
            "https://cdnjs.cloudflare.com/ajax/libs/KaTeX/0.16.11/katex.min.css",
        ))
        .child(stylesheet("/blog.css"));
    if post.has_style_override {
        head = head.child(stylesheet("style.css"));
    }
    let date = post.date.unwrap_or_else(|| String::from("unpublished"));

    Document::new(
        el("html")
            .attr("lang", "en-us")
            .child(head.child(el("title").text(format!("{} | {}", post.title, AUTHOR))))
            .child(
                el("body").child(
                    el("main")
                        .child(el("h1").text(post.title))
                        .child(
                            el("p").child(
                                el("em")
                                    .text("by ")
                                    .child(el("a").attr("href", "/").text(AUTHOR))
                                    .child(text(format!(", {}", date))),
                            ),
                        )
                        .child(el("div").attr("id", "body").child(post.body)),
                ),
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::published;

    fn post(has_style_override: bool, date: Option<&str>) -> Document {
        compose_blog_post(BlogPost {
            title: "Dice & Bias",
            date: date.map(str::to_owned),
            has_style_override,
            body: Markup::trusted("<p>Hello <em>there</em></p>"),
        })
    }

    #[test]
    fn test_blog_post_body_is_raw() {
        let html = post(false, Some("2024-10-20")).to_html();
        assert!(html.contains("<p>Hello <em>there</em></p>"));
        assert!(html.contains("<title>Dice &amp; Bias | Daniel Prol</title>"));
        assert!(html.contains("<em>by <a href=\"/\">Daniel Prol</a>, 2024-10-20</em>"));
    }

    #[test]
    fn test_blog_post_style_override() {
        let link = r#"<link rel="stylesheet" href="style.css">"#;
        assert!(post(true, None).to_html().contains(link));
        assert!(!post(false, None).to_html().contains(link));
    }

    #[test]
    fn test_blog_post_stylesheets() {
        let html = post(false, None).to_html();
        assert!(html.contains("katex.min.css"));
        assert!(html.contains(r#"<link rel="stylesheet" href="/blog.css">"#));
        assert!(!html.contains("highlight.js"));
    }

    #[test]
    fn test_unpublished_byline() {
        assert!(post(false, None).to_html().contains(", unpublished</em>"));
    }

    #[test]
    fn test_blog_index_order() {
        let posts = vec![
            BlogPostEntry::new("older", "Older").dated(2024, 5, 10),
            BlogPostEntry::new("draft", "Draft"),
            BlogPostEntry::new("newer", "Newer").dated(2025, 6, 23),
            BlogPostEntry::new("away", "Away").dated(2023, 1, 2).with_href("https://example.org/away"),
        ];
        let html = blog_index(&published(&posts)).render();
        assert_eq!(
            concat!(
                "<ul>",
                "<li>2025-06-23 <a href=\"/blog/newer/\">Newer</a></li>",
                "<li>2024-05-10 <a href=\"/blog/older/\">Older</a></li>",
                "<li>2023-01-02 <a href=\"https://example.org/away\">Away</a></li>",
                "</ul>",
            ),
            html.as_str()
        );
    }

    #[test]
    fn test_home_embeds_fragments() {
        let home = compose_home(
            el("div").class("publications").into(),
            el("ul").class("marker").into(),
        )
        .to_html();
        assert!(home.starts_with("<!doctype html>\n<html lang=\"en-us\">"));
        assert!(home.contains("<div class=\"publications\"></div>"));
        assert!(home.contains("<ul class=\"marker\"></ul>"));
        assert!(home.contains("<title>Daniel Prol</title>"));
    }
}
