//! Hand-curated templates for popular topics, plus the generic last-resort path.
//!
//! Templates are matched by case-insensitive substring of the key in the topic,
//! in table order, so more specific keys come first (`fastapi` before `python`).

use reqwest::Url;

use crate::models::resource::{CategoryMap, Resource};

/// A static resource entry: title, url, description, platform, price.
#[derive(Debug, Clone, Copy)]
pub struct Seed(
    pub &'static str,
    pub &'static str,
    pub &'static str,
    pub &'static str,
    pub &'static str,
);

impl Seed {
    fn to_resource(self) -> Resource {
        let Seed(title, url, description, platform, price) = self;
        Resource::new(title, url)
            .with_description(description)
            .with_platform(platform)
            .with_price(price)
    }
}

#[derive(Debug)]
pub struct Template {
    pub key: &'static str,
    pub docs: &'static [Seed],
    pub blogs: &'static [Seed],
    pub videos: &'static [Seed],
    pub free_courses: &'static [Seed],
    pub paid_courses: &'static [Seed],
}

impl Template {
    pub fn to_categories(&self) -> CategoryMap {
        let convert = |seeds: &[Seed]| seeds.iter().map(|s| s.to_resource()).collect::<Vec<_>>();
        CategoryMap {
            docs: convert(self.docs),
            blogs: convert(self.blogs),
            videos: convert(self.videos),
            free_courses: convert(self.free_courses),
            paid_courses: convert(self.paid_courses),
        }
    }
}

#[rustfmt::skip]
pub static TEMPLATES: &[Template] = &[
    Template {
        key: "fastapi",
        docs: &[
            Seed("FastAPI Documentation", "https://fastapi.tiangolo.com/", "Official FastAPI documentation", "FastAPI", "Free"),
            Seed("FastAPI Tutorial", "https://fastapi.tiangolo.com/tutorial/", "FastAPI user guide", "FastAPI", "Free"),
        ],
        blogs: &[
            Seed("Real Python", "https://realpython.com/", "Practical Python tutorials and articles", "Real Python", "Free"),
        ],
        videos: &[],
        free_courses: &[],
        paid_courses: &[],
    },
    Template {
        key: "django",
        docs: &[
            Seed("Django Documentation", "https://docs.djangoproject.com/", "Official Django documentation", "Django", "Free"),
            Seed("Django Tutorial", "https://docs.djangoproject.com/en/stable/intro/tutorial01/", "Django getting started tutorial", "Django", "Free"),
        ],
        blogs: &[
            Seed("Real Python", "https://realpython.com/", "Practical Python tutorials and articles", "Real Python", "Free"),
        ],
        videos: &[],
        free_courses: &[],
        paid_courses: &[],
    },
    Template {
        key: "react",
        docs: &[
            Seed("React Official Documentation", "https://react.dev", "Official React documentation with hooks and modern practices", "Official", "Free"),
            Seed("React Tutorial", "https://react.dev/learn", "Interactive React tutorial", "Official", "Free"),
            Seed("React Patterns", "https://reactpatterns.com", "Common React patterns and best practices", "Web", "Free"),
        ],
        blogs: &[
            Seed("Overreacted by Dan Abramov", "https://overreacted.io", "Deep insights into React by its core maintainer", "Blog", "Free"),
            Seed("React Blog", "https://react.dev/blog", "Official React blog", "Official", "Free"),
            Seed("React Blog on dev.to", "https://dev.to/t/react", "Community articles about React development", "Dev.to", "Free"),
        ],
        videos: &[
            Seed("React Official Channel", "https://www.youtube.com/@ReactJS", "Official React team videos and conferences", "YouTube", "Free"),
            Seed("Traversy Media React Playlist", "https://www.youtube.com/playlist?list=PLillGF-RfqbY3c2r0htQyVbDJJoBFE6Rb", "Comprehensive React tutorials", "YouTube", "Free"),
        ],
        free_courses: &[
            Seed("React Course on freeCodeCamp", "https://www.freecodecamp.org/learn/front-end-development-libraries/", "Interactive React curriculum", "freeCodeCamp", "Free"),
            Seed("React Basics on Codecademy", "https://www.codecademy.com/learn/react-101", "Interactive React fundamentals", "Codecademy", "Free"),
        ],
        paid_courses: &[
            Seed("Complete React Developer Course", "https://www.udemy.com/course/react-redux/", "Comprehensive React and Redux course", "Udemy", "$89.99"),
            Seed("React Path on Pluralsight", "https://www.pluralsight.com/paths/react", "Professional React skill path", "Pluralsight", "$29/month"),
        ],
    },
    Template {
        key: "scala",
        docs: &[
            Seed("Scala Official Documentation", "https://docs.scala-lang.org/", "Official Scala documentation", "Scala", "Free"),
            Seed("Scala Tour", "https://docs.scala-lang.org/tour/tour-of-scala.html", "Tour of Scala programming language", "Scala", "Free"),
            Seed("Scala Getting Started", "https://docs.scala-lang.org/getting-started/", "Getting started with Scala", "Scala", "Free"),
            Seed("Scala Book", "https://docs.scala-lang.org/scala3/book/introduction.html", "Scala 3 Book - comprehensive guide", "Scala", "Free"),
        ],
        blogs: &[
            Seed("Scala Official Blog", "https://www.scala-lang.org/blog/", "Official Scala blog with news and tutorials", "Scala Blog", "Free"),
            Seed("Rock the JVM Scala Articles", "https://blog.rockthejvm.com/", "High-quality Scala and functional programming articles", "Rock the JVM", "Free"),
            Seed("Baeldung Scala", "https://www.baeldung.com/scala/", "Comprehensive Scala tutorials and guides", "Baeldung", "Free"),
        ],
        videos: &[
            Seed("Rock the JVM Scala Course", "https://www.youtube.com/watch?v=DzFt0YkZo8M", "Complete Scala programming course", "Rock the JVM", "Free"),
            Seed("Scala Fundamentals", "https://www.youtube.com/results?search_query=scala+programming+tutorial", "Scala programming fundamentals", "YouTube", "Free"),
        ],
        free_courses: &[
            Seed("Scala Exercises", "https://www.scala-exercises.org/", "Interactive Scala exercises and tutorials", "Scala Exercises", "Free"),
            Seed("edX Scala Course", "https://www.edx.org/learn/scala", "Introduction to Scala programming", "edX", "Free"),
        ],
        paid_courses: &[
            Seed("Coursera Scala Course", "https://www.coursera.org/specializations/scala", "Functional Programming in Scala Specialization", "Coursera", "$39-79/month"),
            Seed("Rock the JVM", "https://rockthejvm.com/", "Advanced Scala and functional programming courses", "Rock the JVM", "Varies"),
        ],
    },
    Template {
        key: "javascript",
        docs: &[
            Seed("MDN JavaScript Guide", "https://developer.mozilla.org/en-US/docs/Web/JavaScript/Guide", "Comprehensive JavaScript guide", "MDN", "Free"),
            Seed("JavaScript.info", "https://javascript.info/", "Modern JavaScript tutorial", "JavaScript.info", "Free"),
        ],
        blogs: &[
            Seed("MDN Web Docs", "https://developer.mozilla.org/", "Comprehensive web development resources", "MDN", "Free"),
        ],
        videos: &[],
        free_courses: &[],
        paid_courses: &[],
    },
    Template {
        key: "python",
        docs: &[
            Seed("Python Official Documentation", "https://docs.python.org/3/", "Official Python 3 documentation", "Python", "Free"),
            Seed("Python Tutorial", "https://docs.python.org/3/tutorial/", "Official Python tutorial", "Python", "Free"),
        ],
        blogs: &[
            Seed("Real Python", "https://realpython.com/", "Practical Python tutorials and articles", "Real Python", "Free"),
            Seed("Python.org Blog", "https://blog.python.org/", "Official Python blog", "Python", "Free"),
        ],
        videos: &[
            Seed("Python Tutorial for Beginners", "https://www.youtube.com/results?search_query=python+tutorial+beginners", "Python programming for beginners", "YouTube", "Free"),
        ],
        free_courses: &[
            Seed("freeCodeCamp Python", "https://www.freecodecamp.org/learn/scientific-computing-with-python/", "Scientific Computing with Python", "freeCodeCamp", "Free"),
        ],
        paid_courses: &[],
    },
];

/// First template whose key appears in the topic, ignoring case.
pub fn find_template(topic: &str) -> Option<&'static Template> {
    let topic = topic.to_lowercase();
    TEMPLATES.iter().find(|t| topic.contains(t.key))
}

/// Last-resort path: one search-style link per category, built from the topic.
pub fn generic_categories(topic: &str) -> CategoryMap {
    let topic = topic.trim();
    let tag: String = topic
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    let mut categories = CategoryMap::default();
    categories.docs.push(
        Resource::new(
            format!("{topic} Official Documentation"),
            search_url(
                "https://www.google.com/search",
                "q",
                &format!("{topic} official documentation"),
            ),
        )
        .with_description(format!("Official {topic} documentation and guides"))
        .with_platform("Web Search")
        .with_price("Free"),
    );
    categories.blogs.push(
        Resource::new(format!("{topic} on dev.to"), format!("https://dev.to/t/{tag}"))
            .with_description(format!("Community articles about {topic}"))
            .with_platform("Dev.to")
            .with_price("Free"),
    );
    categories.videos.push(
        Resource::new(
            format!("{topic} Video Tutorials"),
            search_url(
                "https://www.youtube.com/results",
                "search_query",
                &format!("{topic} tutorial"),
            ),
        )
        .with_description(format!("Practical {topic} video tutorials"))
        .with_platform("YouTube")
        .with_price("Free"),
    );
    categories.free_courses.push(
        Resource::new(
            format!("{topic} Free Courses"),
            search_url("https://www.google.com/search", "q", &format!("{topic} free course")),
        )
        .with_description(format!("Find free {topic} courses"))
        .with_platform("Web Search")
        .with_price("Free"),
    );
    categories.paid_courses.push(
        Resource::new(
            format!("Complete {topic} Course on Udemy"),
            search_url("https://www.udemy.com/courses/search/", "q", topic),
        )
        .with_description(format!("Comprehensive {topic} training"))
        .with_platform("Udemy")
        .with_price("Varies"),
    );
    categories
}

fn search_url(base: &str, param: &str, query: &str) -> String {
    match Url::parse_with_params(base, &[(param, query)]) {
        Ok(url) => url.to_string(),
        Err(_) => base.to_string(),
    }
}
