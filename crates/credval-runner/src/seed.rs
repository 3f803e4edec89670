//! Fixed demonstration roster and request mix.

use credval_core::NewStudent;

pub const DEMO_INSTITUTIONS: [&str; 4] = ["MIT", "Stanford University", "UC Berkeley", "Harvard University"];

/// Added one at a time to MIT.
pub fn mit_students() -> Vec<NewStudent> {
    vec![
        NewStudent::new("MIT001", "Alice Johnson", "Computer Science", 3.85, 2023),
        NewStudent::new("MIT002", "Bob Smith", "Electrical Engineering", 3.62, 2024),
        NewStudent::new("MIT003", "Carol White", "Mechanical Engineering", 3.91, 2023),
    ]
}

/// Added as one batch per institution.
pub fn bulk_rosters() -> Vec<(&'static str, Vec<NewStudent>)> {
    vec![
        (
            "Stanford University",
            vec![
                NewStudent::new("STAN001", "Charlie Brown", "Data Science", 3.95, 2023),
                NewStudent::new("STAN002", "Eva Green", "Machine Learning", 3.78, 2024),
                NewStudent::new("STAN003", "Frank Miller", "Artificial Intelligence", 3.88, 2023),
                NewStudent::new("STAN004", "Helen Troy", "Data Science", 3.72, 2024),
            ],
        ),
        (
            "UC Berkeley",
            vec![
                NewStudent::new("BERK001", "Diana Prince", "Cybersecurity", 3.96, 2024),
                NewStudent::new("BERK002", "Grace Hopper", "Software Engineering", 4.00, 2023),
                NewStudent::new("BERK003", "Isaac Newton", "Computer Science", 3.89, 2024),
            ],
        ),
        (
            "Harvard University",
            vec![
                NewStudent::new("HARV001", "Jane Doe", "Computer Science", 3.81, 2023),
                NewStudent::new("HARV002", "John Smith", "Information Technology", 3.68, 2024),
                NewStudent::new("HARV003", "Maria Garcia", "Data Analytics", 3.92, 2024),
            ],
        ),
    ]
}

/// `(student_id, requester)`; `MIT999` is deliberately unknown.
pub const SINGLE_REQUESTS: [(&str, &str); 5] = [
    ("MIT001", "Google Inc."),
    ("STAN002", "Microsoft"),
    ("BERK001", "Amazon"),
    ("MIT999", "Meta"),
    ("HARV001", "Apple"),
];

pub const BULK_REQUESTER: &str = "Tesla";
pub const BULK_REQUESTS: [&str; 4] = ["STAN001", "MIT002", "BERK002", "HARV003"];
