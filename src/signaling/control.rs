use super::coordinator::Coordinator;
use super::protocol::{ConnectionId, ControlCommand};

impl Coordinator {
    /// Delivers a mute/unmute command when the issuer is an identified
    /// teacher. Anything else is dropped without feedback.
    pub fn issue_command(&self, command: ControlCommand, target: &ConnectionId, issuer: &ConnectionId) {
        if !self.registry.is_authorized(issuer) {
            tracing::debug!(
                issuer = %issuer,
                target_id = %target,
                command = ?command,
                "Ignoring control command from unauthorized connection"
            );
            return;
        }

        let delivered = self.emit(target, command.into_event());
        tracing::info!(
            issuer = %issuer,
            target_id = %target,
            command = ?command,
            delivered,
            "Control command issued"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::coordinator::test_support::connect;
    use super::super::protocol::OutboundEvent;
    use super::*;

    #[test]
    fn test_teacher_can_mute_and_unmute() {
        let mut coordinator = Coordinator::new();
        let t = connect(&mut coordinator, "t");
        let mut s = connect(&mut coordinator, "s");
        coordinator.join(&t.id, Some("101"), Some("Ms. Frizzle".to_string()), Some("teacher"));

        coordinator.issue_command(ControlCommand::Mute, &s.id, &t.id);
        coordinator.issue_command(ControlCommand::Unmute, &s.id, &t.id);

        assert_eq!(s.drain(), vec![OutboundEvent::Mute, OutboundEvent::Unmute]);
    }

    #[test]
    fn test_student_command_is_ignored() {
        let mut coordinator = Coordinator::new();
        let mut s1 = connect(&mut coordinator, "s1");
        let mut s2 = connect(&mut coordinator, "s2");
        coordinator.join(&s1.id, Some("101"), Some("Arnold".to_string()), Some("student"));
        s1.drain();

        coordinator.issue_command(ControlCommand::Mute, &s2.id, &s1.id);

        assert!(s1.drain().is_empty());
        assert!(s2.drain().is_empty());
    }

    #[test]
    fn test_anonymous_and_nameless_teachers_are_ignored() {
        let mut coordinator = Coordinator::new();
        let anon = connect(&mut coordinator, "anon");
        let nameless = connect(&mut coordinator, "nameless");
        let mut s = connect(&mut coordinator, "s");
        coordinator.join(&nameless.id, Some("101"), None, Some("teacher"));

        coordinator.issue_command(ControlCommand::Mute, &s.id, &anon.id);
        coordinator.issue_command(ControlCommand::Mute, &s.id, &nameless.id);

        assert!(s.drain().is_empty());
    }

    #[test]
    fn test_command_to_absent_target_is_dropped() {
        let mut coordinator = Coordinator::new();
        let mut t = connect(&mut coordinator, "t");
        coordinator.join(&t.id, Some("101"), Some("Ms. Frizzle".to_string()), Some("teacher"));
        t.drain();

        coordinator.issue_command(ControlCommand::Unmute, &"gone".into(), &t.id);

        assert!(t.drain().is_empty());
    }

    #[test]
    fn test_authorization_follows_latest_join() {
        let mut coordinator = Coordinator::new();
        let t = connect(&mut coordinator, "t");
        let mut s = connect(&mut coordinator, "s");
        coordinator.join(&t.id, Some("101"), Some("Ms. Frizzle".to_string()), Some("teacher"));
        coordinator.join(&t.id, Some("102"), Some("Ms. Frizzle".to_string()), Some("student"));

        coordinator.issue_command(ControlCommand::Mute, &s.id, &t.id);

        assert!(s.drain().is_empty());
    }
}
