//! Built-in diagram templates.

/// Diagram shown when a session starts.
pub const DEFAULT_DIAGRAM: &str = "\
sequenceDiagram;
    participant A as Browser Client;
    participant B as System;
    participant C as DynamoDB;
    A->>B: Request;
    B->>C: Query;
    C-->>B: Result;
    B-->>A: Response;";

/// A named starter diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    pub title: &'static str,
    pub definition: &'static str,
}

pub const TEMPLATES: &[Template] = &[
    Template {
        name: "sequence",
        title: "Sequence diagram",
        definition: DEFAULT_DIAGRAM,
    },
    Template {
        name: "flowchart",
        title: "Flowchart",
        definition: "\
flowchart TD
    A[Start] --> B{Is it working?}
    B -->|Yes| C[Ship it]
    B -->|No| D[Debug]
    D --> B",
    },
    Template {
        name: "class",
        title: "Class diagram",
        definition: "\
classDiagram
    class Animal {
        +String name
        +speak()
    }
    class Dog {
        +fetch()
    }
    Animal <|-- Dog",
    },
    Template {
        name: "state",
        title: "State diagram",
        definition: "\
stateDiagram-v2
    [*] --> Idle
    Idle --> Running: start
    Running --> Idle: stop
    Running --> [*]",
    },
    Template {
        name: "er",
        title: "Entity relationship diagram",
        definition: "\
erDiagram
    CUSTOMER ||--o{ ORDER : places
    ORDER ||--|{ LINE_ITEM : contains
    PRODUCT ||--o{ LINE_ITEM : \"ordered in\"",
    },
];

/// Look up a template by name, case-insensitively.
pub fn find(name: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.name.eq_ignore_ascii_case(name.trim()))
}
