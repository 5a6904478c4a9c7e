//! Static course-track content served by the academy pages.

use serde::Serialize;

/// Course tracks advertised on the landing page, in display order.
pub const COURSE_TRACKS: [&str; 6] = [
    "Web Development",
    "Data Science",
    "Cybersecurity",
    "Cloud Computing",
    "AI & Machine Learning",
    "Mobile Development",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogTab {
    Overview,
    Domains,
    Tools,
    Certifications,
}

impl CatalogTab {
    pub const ALL: [CatalogTab; 4] = [
        CatalogTab::Overview,
        CatalogTab::Domains,
        CatalogTab::Tools,
        CatalogTab::Certifications,
    ];

    /// Case-insensitive lookup; anything unrecognised shows the overview.
    pub fn parse(raw: &str) -> Self {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(wanted))
            .unwrap_or(CatalogTab::Overview)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CatalogTab::Overview => "overview",
            CatalogTab::Domains => "domains",
            CatalogTab::Tools => "tools",
            CatalogTab::Certifications => "certifications",
        }
    }

    /// Label shown on the tab button.
    pub fn label(self) -> &'static str {
        match self {
            CatalogTab::Overview => "Overview",
            CatalogTab::Domains => "Domains",
            CatalogTab::Tools => "Tools",
            CatalogTab::Certifications => "Certifications",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackOverview {
    pub title: &'static str,
    pub description: &'static str,
    pub duration: &'static str,
    pub level: &'static str,
    pub image: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub name: &'static str,
    pub image: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSection {
    pub title: &'static str,
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoreConcept {
    pub name: &'static str,
    pub description: &'static str,
}

/// Body of a single tab: the overview card or a grid of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TabContent {
    Overview(TrackOverview),
    Grid { items: Vec<CatalogItem> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabView {
    pub tab: CatalogTab,
    pub title: &'static str,
    pub content: TabContent,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackCatalog {
    pub overview: TrackOverview,
    pub tagline: &'static str,
    pub domains: CatalogSection,
    pub tools: CatalogSection,
    pub certifications: CatalogSection,
    pub core_concepts: Vec<CoreConcept>,
    pub assessment_process: Vec<&'static str>,
    pub motto: &'static str,
}

impl TrackCatalog {
    pub fn cybersecurity() -> Self {
        Self {
            overview: TrackOverview {
                title: "Cybersecurity",
                description: "Master the art of protecting systems, networks, and programs from digital attacks. Learn ethical hacking techniques, network security fundamentals, and digital forensics to become a skilled cybersecurity professional.",
                duration: "7 months",
                level: "Intermediate",
                image: "/assets/cybersecurity/cybersecurity.jpg",
            },
            tagline: "Master Ethical Hacking, Network Security, and Digital Forensics",
            domains: CatalogSection {
                title: "Security Domains",
                items: vec![
                    item("Ethical Hacking", "/assets/cybersecurity/ethical-hacking.jpg"),
                    item("Network Security", "/assets/cybersecurity/network-security.jpg"),
                    item("Digital Forensics", "/assets/cybersecurity/digital-forensics.jpg"),
                    item("Cryptography", "/assets/cybersecurity/cryptography.jpg"),
                ],
            },
            tools: CatalogSection {
                title: "Security Tools",
                items: vec![
                    item("Kali Linux", "/assets/cybersecurity/kali-linux.jpg"),
                    item("Wireshark", "/assets/cybersecurity/wireshark.jpg"),
                    item("Metasploit", "/assets/cybersecurity/metasploit.jpg"),
                    item("Nmap", "/assets/cybersecurity/nmap.jpg"),
                ],
            },
            certifications: CatalogSection {
                title: "Career Paths",
                items: vec![
                    item("Security Analyst", "/assets/cybersecurity/security-analyst.jpg"),
                    item("Penetration Tester", "/assets/cybersecurity/penetration-tester.webp"),
                    item("Forensic Expert", "/assets/cybersecurity/forensic-expert.webp"),
                    item("Security Architect", "/assets/cybersecurity/security-architect.webp"),
                ],
            },
            core_concepts: vec![
                CoreConcept {
                    name: "CIA Triad",
                    description: "Confidentiality, Integrity, and Availability - the fundamental principles of security",
                },
                CoreConcept {
                    name: "Threat Modeling",
                    description: "Identifying potential threats and vulnerabilities in systems",
                },
                CoreConcept {
                    name: "Risk Management",
                    description: "Assessing and mitigating potential security risks",
                },
            ],
            assessment_process: vec![
                "Reconnaissance",
                "Scanning",
                "Gaining Access",
                "Maintaining Access",
                "Covering Tracks",
            ],
            motto: "Security is not a product, but a process.",
        }
    }

    pub fn section(&self, tab: CatalogTab) -> Option<&CatalogSection> {
        match tab {
            CatalogTab::Overview => None,
            CatalogTab::Domains => Some(&self.domains),
            CatalogTab::Tools => Some(&self.tools),
            CatalogTab::Certifications => Some(&self.certifications),
        }
    }

    pub fn tab_view(&self, tab: CatalogTab) -> TabView {
        match self.section(tab) {
            Some(section) => TabView {
                tab,
                title: section.title,
                content: TabContent::Grid {
                    items: section.items.clone(),
                },
            },
            None => TabView {
                tab,
                title: self.overview.title,
                content: TabContent::Overview(self.overview.clone()),
            },
        }
    }
}

fn item(name: &'static str, image: &'static str) -> CatalogItem {
    CatalogItem { name, image }
}
