//! Resolution categories offered during intake.

/// A specific resolution focus within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubCategory {
    /// Stored value, e.g. "Start a Consistent Exercise Routine".
    pub title: &'static str,
    /// Short explanation shown next to the title.
    pub blurb: &'static str,
}

/// A top-level resolution category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub icon: &'static str,
    pub sub_categories: &'static [SubCategory],
}

impl Category {
    /// Display label including the icon.
    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.icon)
    }

    /// Look up a sub-category by exact title.
    pub fn sub_category(&self, title: &str) -> Option<&'static SubCategory> {
        self.sub_categories.iter().find(|s| s.title == title)
    }
}

/// Find a category by exact name.
pub fn find_category(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.name == name)
}

const fn sub(title: &'static str, blurb: &'static str) -> SubCategory {
    SubCategory { title, blurb }
}

pub static CATEGORIES: &[Category] = &[
    Category {
        name: "Health & Fitness",
        icon: "🏃",
        sub_categories: &[
            sub("Start a Consistent Exercise Routine", "Build lasting fitness habits"),
            sub("Achieve Target Weight", "Through healthy and sustainable methods"),
            sub("Master a New Sport/Activity", "Challenge yourself physically"),
            sub("Complete a Fitness Challenge", "Train for a specific goal"),
            sub("Transform Eating Habits", "Focus on nutrition and meal planning"),
            sub("Improve Sleep Quality", "Develop better sleep routines"),
            sub("Build Strength and Muscle", "Focus on resistance training"),
            sub("Enhance Flexibility", "Incorporate stretching and mobility work"),
        ],
    },
    Category {
        name: "Career Growth",
        icon: "💼",
        sub_categories: &[
            sub("Achieve Promotion", "Work towards career advancement"),
            sub("Switch Careers", "Transition to new professional path"),
            sub("Start a Business", "Launch entrepreneurial venture"),
            sub("Develop Leadership Skills", "Grow management abilities"),
            sub("Get Professional Certification", "Enhance qualifications"),
            sub("Improve Work-Life Balance", "Set better boundaries"),
            sub("Build Personal Brand", "Enhance professional presence"),
            sub("Master New Industry Tools", "Stay current with technology"),
        ],
    },
    Category {
        name: "Personal Development",
        icon: "🌱",
        sub_categories: &[
            sub("Learn a New Language", "Achieve conversational fluency"),
            sub("Master a Creative Skill", "Develop artistic abilities"),
            sub("Read More Books", "Expand knowledge and perspectives"),
            sub("Start Journaling", "Practice self-reflection and writing"),
            sub("Learn to Play an Instrument", "Develop musical abilities"),
            sub("Take Online Courses", "Expand educational horizons"),
            sub("Practice Public Speaking", "Improve communication skills"),
            sub("Develop Time Management", "Enhance productivity and efficiency"),
        ],
    },
    Category {
        name: "Financial Goals",
        icon: "💰",
        sub_categories: &[
            sub("Create Emergency Fund", "Build financial security"),
            sub("Start Investing", "Learn and grow investment portfolio"),
            sub("Pay Off Specific Debt", "Focus on debt elimination"),
            sub("Increase Income", "Through side hustles or career growth"),
            sub("Budget Management", "Track and optimize spending"),
            sub("Save for Major Purchase", "Work towards specific goal"),
            sub("Learn Financial Planning", "Develop money management skills"),
            sub("Start Retirement Planning", "Focus on long-term security"),
        ],
    },
    Category {
        name: "Relationships",
        icon: "💝",
        sub_categories: &[
            sub("Strengthen Family Bonds", "Spend quality time with family"),
            sub("Deepen Friendships", "Nurture meaningful connections"),
            sub("Improve Communication", "Enhance relationship skills"),
            sub("Find Partner/Romance", "Focus on dating and relationships"),
            sub("Be More Present", "Practice active listening and engagement"),
            sub("Host Regular Gatherings", "Create social connections"),
            sub("Resolve Past Conflicts", "Work on forgiveness and healing"),
            sub("Build Professional Network", "Expand professional relationships"),
        ],
    },
    Category {
        name: "Learning & Education",
        icon: "📚",
        sub_categories: &[
            sub("Complete Online Course", "Master new subject area"),
            sub("Learn Programming", "Develop coding skills"),
            sub("Study New Language", "Achieve language certification"),
            sub("Write a Book/Blog", "Share knowledge and experiences"),
            sub("Master Digital Skills", "Enhance technical abilities"),
            sub("Take Art Classes", "Develop creative expression"),
            sub("Study History/Culture", "Broaden cultural understanding"),
            sub("Learn Musical Instrument", "Develop musical abilities"),
        ],
    },
    Category {
        name: "Creative Projects",
        icon: "🎨",
        sub_categories: &[
            sub("Start Art Portfolio", "Build creative body of work"),
            sub("Write Novel/Story", "Complete creative writing project"),
            sub("Learn Photography", "Master camera and editing skills"),
            sub("Start YouTube Channel", "Create engaging content"),
            sub("Design Digital Art", "Develop graphic design skills"),
            sub("Create Music", "Compose and produce original works"),
            sub("Start Craft Business", "Turn creativity into income"),
            sub("Build Website/App", "Develop web presence"),
        ],
    },
    Category {
        name: "Travel & Adventure",
        icon: "🌎",
        sub_categories: &[
            sub("Visit New Countries", "Explore different cultures"),
            sub("Learn Adventure Sport", "Master outdoor activities"),
            sub("Plan Road Trip", "Explore local destinations"),
            sub("Live Abroad", "Experience different culture"),
            sub("Learn Local History", "Discover community heritage"),
            sub("Start Travel Blog", "Document adventures"),
            sub("Master Photography", "Capture travel moments"),
            sub("Learn Local Language", "Prepare for travel"),
        ],
    },
    Category {
        name: "Sustainability & Environment",
        icon: "🌿",
        sub_categories: &[
            sub("Reduce Carbon Footprint", "Adopt eco-friendly habits"),
            sub("Start Composting", "Reduce waste impact"),
            sub("Create Garden", "Grow own produce"),
            sub("Learn About Sustainability", "Educate on environmental issues"),
            sub("Join Environmental Group", "Support local initiatives"),
            sub("Adopt Zero-Waste", "Minimize environmental impact"),
            sub("Use Renewable Energy", "Switch to sustainable power"),
            sub("Start Recycling Program", "Organize community effort"),
        ],
    },
    Category {
        name: "Community & Social Impact",
        icon: "🤝",
        sub_categories: &[
            sub("Regular Volunteering", "Serve local community"),
            sub("Start Nonprofit", "Create positive change"),
            sub("Mentor Others", "Share knowledge and experience"),
            sub("Lead Community Project", "Organize local initiatives"),
            sub("Support Local Business", "Build community connections"),
            sub("Teach Skills", "Help others learn"),
            sub("Organize Events", "Build community engagement"),
            sub("Advocate for Change", "Support important causes"),
        ],
    },
];
