//! Topic-keyed quote and tip tables.
//!
//! # Invariants
//! - Lookups are total: an unknown topic resolves to `TopicText::Fallback`.

const DEFAULT_QUOTE: &str = "Keep pushing forward!";
const DEFAULT_TIP: &str = "Stay curious and keep learning!";

/// Result of a topic lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicText {
    /// The topic has an entry.
    Known(&'static str),
    /// The topic has no entry; the fixed default applies.
    Fallback(&'static str),
}

impl TopicText {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Known(text) | Self::Fallback(text) => text,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Motivational quote for `topic`.
pub fn motivational_quote(topic: &str) -> TopicText {
    let quote = match topic {
        "fundamentals" => "The foundation of security is knowledge. Keep building!",
        "network_security" => "Secure networks are the backbone of safe communication.",
        "system_security" => "Hardened systems stand strong against threats.",
        "linux_security" => "Master Linux, master control.",
        "scripting" => "Automation is the key to efficiency in security.",
        "lab_setup" => "A good lab is the start of great experiments.",
        "governance" => "Good governance ensures long-term security.",
        "app_security" => "Secure code is unbreakable code.",
        "ethical_hacking" => "Think like an attacker to defend better.",
        "exploit_dev" => "Understanding exploits prevents them.",
        "reverse_engineering" => "Unravel the code to reveal the secrets.",
        "bug_bounty" => "Hunt bugs, reap rewards.",
        "forensics" => "Every trace tells a story.",
        "incident_response" => "Quick response minimizes damage.",
        "malware_analysis" => "Dissect malware to defeat it.",
        "cloud_security" => "Secure the cloud, secure the future.",
        "devsecops" => "Integrate security from the start.",
        "soc_operations" => "Vigilance in operations saves the day.",
        "threat_hunting" => "Hunt threats before they hunt you.",
        "threat_intel" => "Intelligence is power in cybersecurity.",
        "red_team" => "Attack to improve defenses.",
        "blue_team" => "Defend with strategy and skill.",
        "simulation" => "Simulate to prepare for reality.",
        "capstone" => "Apply all you've learned in your capstone.",
        "career" => "Build your career on strong foundations.",
        "review" => "Review to reinforce knowledge.",
        "reflection" => "Reflection leads to growth.",
        _ => return TopicText::Fallback(DEFAULT_QUOTE),
    };
    TopicText::Known(quote)
}

/// Daily tip for `topic`.
pub fn daily_tip(topic: &str) -> TopicText {
    let tip = match topic {
        "fundamentals" => "Start with the basics: Always update your software.",
        "network_security" => "Use VPNs for secure connections.",
        "system_security" => "Enable multi-factor authentication everywhere.",
        "linux_security" => "Practice chmod commands to secure files.",
        "scripting" => "Try writing a simple script to automate a task.",
        "lab_setup" => "Set up a VM to experiment safely.",
        "governance" => "Review a security policy template today.",
        "app_security" => "Test for SQL injection on a practice app.",
        "ethical_hacking" => "Use Nmap to scan a test network.",
        "exploit_dev" => "Experiment with a buffer overflow demo.",
        "reverse_engineering" => "Analyze a simple binary with Ghidra.",
        "bug_bounty" => "Join a bug bounty platform and read guidelines.",
        "forensics" => "Practice imaging a disk with a tool like FTK Imager.",
        "incident_response" => "Simulate a small incident response scenario.",
        "malware_analysis" => "Run a malware sample in a sandbox.",
        "cloud_security" => "Secure an AWS S3 bucket with a policy.",
        "devsecops" => "Integrate a SAST tool into a CI pipeline.",
        "soc_operations" => "Set up a basic alert rule in a SIEM.",
        "threat_hunting" => "Explore MITRE ATT&CK framework tactics.",
        "threat_intel" => "Subscribe to a free threat feed.",
        "red_team" => "Plan a mock phishing attack.",
        "blue_team" => "Create a detection rule for a known attack.",
        "simulation" => "Run a red vs blue exercise with a friend.",
        "capstone" => "Outline your capstone project today.",
        "career" => "Update your LinkedIn profile with a skill.",
        "review" => "Revisit last week's notes for reinforcement.",
        "reflection" => "Write down one lesson learned this week.",
        _ => return TopicText::Fallback(DEFAULT_TIP),
    };
    TopicText::Known(tip)
}

#[cfg(test)]
mod tests {
    use super::{daily_tip, motivational_quote, TopicText};

    #[test]
    fn known_topics_resolve() {
        assert_eq!(
            motivational_quote("forensics"),
            TopicText::Known("Every trace tells a story.")
        );
        assert!(!daily_tip("scripting").is_fallback());
    }

    #[test]
    fn unknown_topics_fall_back_to_defaults() {
        assert_eq!(motivational_quote("No Topic").as_str(), "Keep pushing forward!");
        assert_eq!(daily_tip("").as_str(), "Stay curious and keep learning!");
        assert!(daily_tip("quantum").is_fallback());
    }
}
