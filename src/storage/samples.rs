//! Demo notes used by `init --sample` and `serve --sample`.

use chrono::{DateTime, Utc};

use crate::entity::{normalize_tags, Note, OwnerId};
use crate::summary::summarize;

/// (id, title, content, tags, created_at), newest first.
const SAMPLES: &[(&str, &str, &str, &[&str], &str)] = &[
    (
        "1",
        "Welcome to NoteSync",
        "This is your first note. You can edit or delete it, or create new notes.",
        &["welcome", "getting-started"],
        "2023-08-25T14:00:00Z",
    ),
    (
        "2",
        "Meeting Notes: Project Kickoff",
        "Discussed project timeline, assigned tasks, and set up weekly check-ins. Key points: launch date is October 15, marketing materials need to be ready by September 30.",
        &["meeting", "project"],
        "2023-08-24T10:30:00Z",
    ),
    (
        "3",
        "Ideas for New Features",
        "Here are some ideas for new app features:\n- Dark mode\n- Export notes to PDF\n- Voice recording\n- Collaborative editing\n- Reminder notifications",
        &["ideas", "features", "development"],
        "2023-08-23T09:15:00Z",
    ),
    (
        "4",
        "Book Recommendations",
        "Books to read:\n1. \"Atomic Habits\" by James Clear\n2. \"Deep Work\" by Cal Newport\n3. \"The Psychology of Money\" by Morgan Housel\n4. \"Four Thousand Weeks\" by Oliver Burkeman",
        &["books", "reading"],
        "2023-08-22T16:45:00Z",
    ),
    (
        "5",
        "Weekly Goals",
        "- Finish project proposal\n- Prepare for client call\n- Update portfolio website\n- Complete online course module\n- Schedule doctor appointment",
        &["goals", "productivity"],
        "2023-08-21T11:20:00Z",
    ),
    (
        "6",
        "Recipe: Pasta Primavera",
        "Ingredients:\n- 8oz pasta\n- 2 cups mixed vegetables\n- 2 cloves garlic\n- 1/4 cup olive oil\n- Salt and pepper to taste\n- Grated parmesan\n\nInstructions:\n1. Cook pasta according to package\n2. Sauté vegetables and garlic\n3. Mix everything together\n4. Top with parmesan",
        &["recipe", "food", "cooking"],
        "2023-08-20T19:10:00Z",
    ),
    (
        "7",
        "Workout Plan",
        "Monday: Upper body\nTuesday: Lower body\nWednesday: Cardio\nThursday: Rest\nFriday: Full body\nSaturday: Yoga\nSunday: Rest",
        &["fitness", "health"],
        "2023-08-19T08:00:00Z",
    ),
    (
        "8",
        "Travel Itinerary: Weekend Getaway",
        "Friday:\n- Depart at 3pm\n- Check in to hotel by 6pm\n- Dinner reservation at 8pm\n\nSaturday:\n- Breakfast at hotel\n- Hiking trip (10am-2pm)\n- Spa appointment at 4pm\n- Dinner at local restaurant\n\nSunday:\n- Brunch at 10am\n- Local museum visit\n- Return home by 6pm",
        &["travel", "planning"],
        "2023-08-18T14:30:00Z",
    ),
    (
        "9",
        "Learning Resources for JavaScript",
        "Websites:\n- MDN Web Docs\n- JavaScript.info\n- FreeCodeCamp\n\nBooks:\n- \"Eloquent JavaScript\"\n- \"You Don't Know JS\"\n\nCourses:\n- Frontend Masters\n- Wes Bos JavaScript30\n- Udemy - Modern JavaScript",
        &["javascript", "programming", "learning"],
        "2023-08-17T10:15:00Z",
    ),
    (
        "10",
        "Home Renovation Ideas",
        "Kitchen:\n- Replace countertops\n- New backsplash\n- Paint cabinets\n\nLiving Room:\n- New sofa\n- Area rug\n- Wall art\n\nBathroom:\n- Update fixtures\n- New shower curtain\n- Storage solutions",
        &["home", "renovation", "decor"],
        "2023-08-16T15:45:00Z",
    ),
];

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// The ten demo notes, owned by `owner`, in canonical order.
pub fn sample_notes(owner: &OwnerId) -> Vec<Note> {
    SAMPLES
        .iter()
        .map(|(id, title, content, tags, created)| {
            let created_at = parse_timestamp(created);
            Note {
                id: id.to_string(),
                title: title.to_string(),
                content: content.to_string(),
                summary: summarize(content),
                tags: normalize_tags(tags.iter()),
                created_at,
                updated_at: created_at,
                owner_id: owner.clone(),
            }
        })
        .collect()
}
