//! Test helpers for writing request fixtures.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture file");
}

pub(super) fn temp_root() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// A learner enrolled in Python basics, with a catalog mixing Python, Django
/// and cooking courses.
pub(super) fn python_request() -> Value {
    json!({
        "enrolled_courses": [
            { "id": 1, "title": "Python Basics", "category": "Python",
              "description": "Variables, loops and functions in Python", "enrollment_count": 10 }
        ],
        "all_courses": [
            { "id": 1, "title": "Python Basics", "category": "Python",
              "description": "Variables, loops and functions in Python", "enrollment_count": 10 },
            { "id": 2, "title": "Advanced Python", "category": "Python",
              "description": "Generators, decorators and Python internals", "enrollment_count": 100 },
            { "id": 3, "title": "Knife Skills", "category": "Cooking",
              "description": "Chopping onions like a chef", "enrollment_count": 500 },
            { "id": 4, "title": "Django Web Apps", "category": "Django",
              "description": "Build web apps with Django and Python", "enrollment_count": 40 }
        ],
        "top_n": 2
    })
}
