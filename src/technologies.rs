/// Fixed vocabulary of technology tags a project may declare.
pub const TECHNOLOGY_TAGS: &[&str] = &[
    "Angular",
    "AWS",
    "Azure",
    "Bootstrap",
    "C",
    "C#",
    "C++",
    "CSS",
    "Dart",
    "Django",
    "Docker",
    "Elixir",
    "Express",
    "Firebase",
    "Flask",
    "Flutter",
    "Go",
    "GraphQL",
    "Haskell",
    "HTML",
    "Java",
    "JavaScript",
    "Kotlin",
    "Kubernetes",
    "MongoDB",
    "MySQL",
    "Next.js",
    "Node.js",
    "PHP",
    "PostgreSQL",
    "Python",
    "React",
    "Redis",
    "Ruby",
    "Rails",
    "Rust",
    "Scala",
    "Spring",
    "SQLite",
    "Svelte",
    "Swift",
    "Tailwind",
    "TypeScript",
    "Vue",
];

/// Canonical spelling of `tag`, matched case-insensitively.
pub fn canonical(tag: &str) -> Option<&'static str> {
    TECHNOLOGY_TAGS
        .iter()
        .copied()
        .find(|known| known.eq_ignore_ascii_case(tag))
}
